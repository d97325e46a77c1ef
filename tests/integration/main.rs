mod common;
mod health_test;
mod relay_test;
