//! # personnel-gate
//!
//! Gate de sécurité du système de gestion du personnel: anti force brute sur
//! la connexion (compteur d'échecs, verrouillage, bans) et analyse antivirus
//! des documents déposés avant leur stockage.

pub mod app;
pub mod audit;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod scan;
pub mod security;
