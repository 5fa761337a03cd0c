//! Integration tests, registered with the test inventory
