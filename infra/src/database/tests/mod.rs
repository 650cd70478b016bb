mod connection_tests;
mod store_tests;
