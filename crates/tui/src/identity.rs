//! Per-client identity.
//!
//! The identity is a random 32-byte value persisted hex-encoded next to
//! the client's other state. Its string form is the stable public
//! identifier that seeds sprite color derivation; it is not a signing key.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use rand::RngCore;

const IDENTITY_FILE: &str = "identity.txt";

/// Load the identity from `dir`, generating and persisting a new one on
/// first run.
pub fn load_or_generate(dir: &Path) -> Result<String> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let path = dir.join(IDENTITY_FILE);
    if path.is_file() {
        let id = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?
            .trim()
            .to_string();
        let bytes = hex::decode(&id)
            .with_context(|| format!("{} is not hex-encoded", path.display()))?;
        ensure!(
            bytes.len() == 32,
            "{} holds {} bytes, expected 32",
            path.display(),
            bytes.len()
        );
        return Ok(id);
    }

    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    let id = hex::encode(bytes);
    write_identity(&path, &id).with_context(|| format!("writing {}", path.display()))?;
    Ok(id)
}

#[cfg(unix)]
fn write_identity(path: &Path, id: &str) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut file = File::create(path)?;
    file.write_all(id.as_bytes())?;
    file.sync_all()?;

    // Owner-only, same treatment as any private key material.
    let mut permissions = file.metadata()?.permissions();
    permissions.set_mode(0o600);
    fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn write_identity(path: &Path, id: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(id.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_then_reloads_the_same_identity() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = load_or_generate(dir.path()).expect("generate");
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));

        let second = load_or_generate(dir.path()).expect("reload");
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_a_truncated_identity_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Valid hex, but only four bytes of it.
        fs::write(dir.path().join(IDENTITY_FILE), "deadbeef").expect("write");
        assert!(load_or_generate(dir.path()).is_err());
    }

    #[test]
    fn rejects_a_corrupt_identity_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(IDENTITY_FILE), "not hex!").expect("write");
        assert!(load_or_generate(dir.path()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn identity_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        load_or_generate(dir.path()).expect("generate");
        let mode = fs::metadata(dir.path().join(IDENTITY_FILE))
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
