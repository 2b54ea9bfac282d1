use netmon_types::device::{AuthProtocol, PrivProtocol, UsmAuth, UsmPrivacy};
use snmp2::v3;

use crate::error::SnmpError;

fn passphrase(var_name: &str) -> Result<String, SnmpError> {
    std::env::var(var_name).map_err(|_| {
        SnmpError::AuthFailure(format!(
            "environment variable {var_name} is not set for SNMPv3 credentials"
        ))
    })
}

/// Build a `snmp2::v3::Security` from our USM auth/privacy config (MD5/SHA
/// auth, DES/AES privacy). Passphrases are read from the environment at
/// connect time, never stored in `DeviceConfig` itself.
pub fn build_v3_security(
    user: &str,
    auth: Option<&UsmAuth>,
    privacy: Option<&UsmPrivacy>,
) -> Result<v3::Security, SnmpError> {
    let username = user.as_bytes();

    let security = match (auth, privacy) {
        (None, _) => v3::Security::new(username, b""),
        (Some(auth), None) => {
            let auth_password = passphrase(&auth.passphrase_env)?;
            let auth_protocol = match auth.protocol {
                AuthProtocol::Md5 => v3::AuthProtocol::Md5,
                AuthProtocol::Sha1 => v3::AuthProtocol::Sha1,
            };
            v3::Security::new(username, auth_password.as_bytes()).with_auth_protocol(auth_protocol)
        }
        (Some(auth), Some(privacy)) => {
            let auth_password = passphrase(&auth.passphrase_env)?;
            let priv_password = passphrase(&privacy.passphrase_env)?;
            let auth_protocol = match auth.protocol {
                AuthProtocol::Md5 => v3::AuthProtocol::Md5,
                AuthProtocol::Sha1 => v3::AuthProtocol::Sha1,
            };
            let cipher = match privacy.protocol {
                PrivProtocol::Des => v3::Cipher::Des,
                PrivProtocol::Aes => v3::Cipher::Aes128,
            };
            v3::Security::new(username, auth_password.as_bytes())
                .with_auth_protocol(auth_protocol)
                .with_auth(v3::Auth::AuthPriv {
                    cipher,
                    privacy_password: priv_password.as_bytes().to_vec(),
                })
        }
    };

    Ok(security)
}
