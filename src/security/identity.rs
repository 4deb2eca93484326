//! Normalisation de l'identité client (adresse et identifiant de connexion).
//!
//! Fonctions pures: jamais d'erreur, une entrée inexploitable est renvoyée
//! telle quelle (trim).

const IPV4_MAPPED_PREFIX: &str = "::ffff:";
const IPV6_LOOPBACK: &str = "::1";
const IPV4_LOOPBACK: &str = "127.0.0.1";

/// Longueurs maximales stockables (colonnes `address` / `identifier`)
pub const MAX_ADDRESS_LEN: usize = 64;
pub const MAX_IDENTIFIER_LEN: usize = 255;

/// Forme canonique d'une adresse client.
///
/// - `203.0.113.5:54321` → `203.0.113.5` (un seul `:` suivi de chiffres)
/// - `::ffff:10.0.0.5` → `10.0.0.5`
/// - `::1` → `127.0.0.1`
///
/// Idempotente: `normalize_address(&normalize_address(x)) == normalize_address(x)`.
pub fn normalize_address(raw: &str) -> String {
    let mut address = strip_port(raw.trim());
    // Une adresse mappée peut elle-même porter un port
    while let Some(mapped) = address.strip_prefix(IPV4_MAPPED_PREFIX) {
        address = strip_port(mapped);
    }

    if address == IPV6_LOOPBACK {
        return IPV4_LOOPBACK.to_string();
    }

    address.to_string()
}

/// Adresse client effective d'une requête.
///
/// L'en-tête `X-Forwarded-For` n'est lu que si `trust_proxy` est vrai; seule
/// sa première valeur compte. Une première valeur vide retombe sur l'adresse
/// de connexion.
pub fn derive_client_address(
    connection_address: &str,
    forwarded_for: Option<&str>,
    trust_proxy: bool,
) -> String {
    let forwarded = forwarded_for
        .filter(|_| trust_proxy)
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty());

    normalize_address(forwarded.unwrap_or(connection_address))
}

/// Identifiant de connexion (email) sous forme canonique
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Vrai si l'adresse normalisée tient dans la colonne `address`
pub fn address_fits(address: &str) -> bool {
    address.chars().count() <= MAX_ADDRESS_LEN
}

/// Vrai si l'identifiant normalisé tient dans la colonne `identifier`
pub fn identifier_fits(identifier: &str) -> bool {
    identifier.chars().count() <= MAX_IDENTIFIER_LEN
}

/// `host:port` avec exactement un `:` et un port numérique non vide
fn strip_port(address: &str) -> &str {
    match address.split_once(':') {
        Some((host, port))
            if !host.is_empty()
                && !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit()) =>
        {
            host
        }
        _ => address,
    }
}
