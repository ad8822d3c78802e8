mod helpers;
mod health_check;
mod registration;
mod addresses;
mod restaurants;
mod order;
mod sessions;
