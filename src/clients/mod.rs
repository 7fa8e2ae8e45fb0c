pub mod connpass_client;
