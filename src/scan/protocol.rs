//! Protocole ligne du démon d'analyse.
//!
//! ```text
//! request  = "SCAN" SP path LF
//! response = *( line LF )
//! line     = path ":" SP verdict
//! verdict  = "OK" | signature SP "FOUND" | message SP "ERROR"
//! ```
//!
//! Le démon ferme la connexion après avoir répondu. Toute réponse contenant
//! `FOUND` vaut détection; toute autre réponse, vide comprise, vaut fichier sain.

use super::ScanOutcome;
use std::path::Path;

pub const FOUND_TOKEN: &str = "FOUND";
const OK_TOKEN: &str = "OK";
const ERROR_TOKEN: &str = "ERROR";

/// Ligne de réponse décomposée selon la grammaire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseLine<'a> {
    Ok {
        path: &'a str,
    },
    Found {
        path: &'a str,
        signature: Option<&'a str>,
    },
    Error {
        path: &'a str,
        message: &'a str,
    },
    Unrecognized(&'a str),
}

/// Chemin absolu, sans saut de ligne ni NUL.
///
/// Un chemin relatif ou commençant par `-` n'est jamais transmis au scanner.
pub fn is_scannable_path(path: &Path) -> bool {
    path.is_absolute()
        && !path
            .as_os_str()
            .as_encoded_bytes()
            .iter()
            .any(|b| matches!(b, b'\n' | b'\r' | b'\0'))
}

/// Commande `SCAN` pour un chemin.
///
/// `None` si le chemin n'est pas analysable ou n'est pas de l'UTF-8: un saut
/// de ligne permettrait d'injecter une seconde commande.
pub fn scan_command(path: &Path) -> Option<String> {
    if !is_scannable_path(path) {
        return None;
    }
    let path = path.to_str()?;
    Some(format!("SCAN {path}\n"))
}

pub fn parse_line(line: &str) -> ResponseLine<'_> {
    let line = line.trim();
    let Some((path, verdict)) = line.split_once(':') else {
        return ResponseLine::Unrecognized(line);
    };
    let verdict = verdict.trim();

    if verdict == OK_TOKEN {
        ResponseLine::Ok { path }
    } else if let Some(signature) = verdict.strip_suffix(FOUND_TOKEN) {
        ResponseLine::Found {
            path,
            signature: non_empty(signature),
        }
    } else if let Some(message) = verdict.strip_suffix(ERROR_TOKEN) {
        ResponseLine::Error {
            path,
            message: message.trim(),
        }
    } else {
        ResponseLine::Unrecognized(line)
    }
}

/// Verdict d'une réponse complète (démon ou sortie du binaire)
pub fn interpret(response: &str) -> ScanOutcome {
    if !response.contains(FOUND_TOKEN) {
        return ScanOutcome::Clean;
    }

    for line in response.lines() {
        if let ResponseLine::Found { signature, .. } = parse_line(line) {
            return ScanOutcome::Infected {
                reason: line.trim().to_string(),
                signature: signature.map(str::to_string),
            };
        }
    }

    // FOUND hors position terminale: détection quand même
    let line = response
        .lines()
        .find(|line| line.contains(FOUND_TOKEN))
        .unwrap_or(response)
        .trim();
    let after_path = line.split_once(':').map_or(line, |(_, rest)| rest);
    let signature = after_path.replacen(FOUND_TOKEN, "", 1);
    ScanOutcome::Infected {
        reason: line.to_string(),
        signature: non_empty(&signature).map(str::to_string),
    }
}

/// Lignes `ERROR` ou hors grammaire, journalisées par les backends
pub fn anomalies(response: &str) -> impl Iterator<Item = &str> {
    response.lines().filter(|line| {
        matches!(
            parse_line(line),
            ResponseLine::Error { .. } | ResponseLine::Unrecognized(_)
        ) && !line.trim().is_empty()
    })
}

fn non_empty(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn found_line_yields_signature() {
        let outcome = interpret("/tmp/b.exe: Win.Test.EICAR_HDB-1 FOUND\n");
        assert_eq!(
            outcome,
            ScanOutcome::Infected {
                reason: "/tmp/b.exe: Win.Test.EICAR_HDB-1 FOUND".to_string(),
                signature: Some("Win.Test.EICAR_HDB-1".to_string()),
            }
        );
    }

    #[test]
    fn ok_line_is_clean() {
        assert_eq!(interpret("/tmp/a.pdf: OK\n"), ScanOutcome::Clean);
    }

    #[test]
    fn empty_or_error_response_is_clean() {
        assert_eq!(interpret(""), ScanOutcome::Clean);
        assert_eq!(
            interpret("/tmp/x: lstat() failed: No such file or directory. ERROR"),
            ScanOutcome::Clean
        );
    }

    #[test]
    fn found_without_signature() {
        assert_eq!(
            interpret("/tmp/c.doc: FOUND"),
            ScanOutcome::Infected {
                reason: "/tmp/c.doc: FOUND".to_string(),
                signature: None,
            }
        );
    }

    #[test]
    fn found_in_unexpected_position_still_detects() {
        let outcome = interpret("stream: FOUND Eicar-Signature (heuristic)");
        assert_eq!(
            outcome.signature(),
            Some("Eicar-Signature (heuristic)")
        );
        assert!(outcome.is_infected());
    }

    #[test]
    fn first_found_line_wins_among_several() {
        let outcome = interpret("/a: OK\n/b: Trojan.Foo FOUND\n/c: Worm.Bar FOUND\n");
        assert_eq!(outcome.signature(), Some("Trojan.Foo"));
    }

    #[test]
    fn parse_line_recognizes_grammar() {
        assert_eq!(parse_line("/tmp/a.pdf: OK"), ResponseLine::Ok { path: "/tmp/a.pdf" });
        assert_eq!(
            parse_line("/tmp/x: Access denied. ERROR"),
            ResponseLine::Error {
                path: "/tmp/x",
                message: "Access denied.",
            }
        );
        assert_eq!(parse_line("PONG"), ResponseLine::Unrecognized("PONG"));
    }

    #[test]
    fn anomalies_skip_ok_found_and_blank_lines() {
        let response = "/a: OK\n\n/b: Sig FOUND\n/c: oops ERROR\nweird\n";
        let lines: Vec<&str> = anomalies(response).collect();
        assert_eq!(lines, vec!["/c: oops ERROR", "weird"]);
    }

    #[test]
    fn scan_command_rejects_line_breaks() {
        assert_eq!(
            scan_command(Path::new("/tmp/a.pdf")).as_deref(),
            Some("SCAN /tmp/a.pdf\n")
        );
        assert!(scan_command(Path::new("/tmp/a.pdf\nSHUTDOWN")).is_none());
    }

    #[test]
    fn only_absolute_paths_are_scannable() {
        assert!(is_scannable_path(Path::new("/var/uploads/cv.pdf")));
        assert!(!is_scannable_path(Path::new("uploads/cv.pdf")));
        assert!(!is_scannable_path(Path::new("--remove=yes")));
        assert!(!is_scannable_path(Path::new("")));
        assert!(!is_scannable_path(Path::new("/tmp/a\0b")));
        assert!(scan_command(Path::new("relative.pdf")).is_none());
    }
}
