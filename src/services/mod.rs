pub mod fetch;
pub mod normalizer;
pub mod playlist;
pub mod providers;
pub mod resolver;
