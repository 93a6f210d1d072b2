pub mod auth_layer;
