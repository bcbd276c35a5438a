//! Outbound service integrations.

pub mod whatsapp;
