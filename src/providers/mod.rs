pub mod mfapi_provider;
