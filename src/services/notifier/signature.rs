use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::NotifyError;

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 of `message` under `secret`.
pub fn mac_hex(secret: &str, message: &str) -> Result<String, NotifyError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| NotifyError::Signing(e.to_string()))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Value of the `X-Relay-Signature` header: `sha256=<hex>` over `"{timestamp}.{body}"`.
pub fn sign_relay_request(secret: &str, timestamp: i64, body: &str) -> Result<String, NotifyError> {
    let digest = mac_hex(secret, &format!("{timestamp}.{body}"))?;
    Ok(format!("sha256={digest}"))
}
