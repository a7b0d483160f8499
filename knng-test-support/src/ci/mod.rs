//! Helpers driven by CI environment configuration.

pub mod property_test_profile;
