//! End-to-end tests: hooks registered on a renderer around real Tera renders.

mod helpers;

mod hooks_test;
mod render_test;
