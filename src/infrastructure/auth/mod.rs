mod credentials_provider;

pub use credentials_provider::CredentialsAuthProvider;
