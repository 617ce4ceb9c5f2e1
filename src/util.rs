pub mod arpa;
