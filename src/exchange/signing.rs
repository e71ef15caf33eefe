//! HMAC-SHA256 request signing for the Bybit v2 private REST API.
//!
//! Bybit v2 signs the request parameters themselves: every parameter except
//! `sign` is rendered as `key=value`, the pairs are sorted by key and joined
//! with `&`, and the hex-encoded HMAC-SHA256 of that string (keyed with the
//! API secret) is sent as the `sign` parameter. Secrets are never logged.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

/// Name of the parameter carrying the signature.
pub const SIGN_PARAM: &str = "sign";

/// Render parameters as the canonical `k1=v1&k2=v2` string, sorted by key.
pub fn canonical_query<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pairs: Vec<(&str, &str)> = params.into_iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Sign a parameter set with the API secret.
///
/// Insertion order of `params` does not matter; the canonical string is always
/// sorted by key before hashing.
pub fn sign_params<'a, I>(api_secret: &str, params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let query = canonical_query(params);
    let mut mac = HmacSha256::new_from_slice(api_secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(query.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// A parameter set plus its computed signature, ready to be form-encoded.
///
/// Built fresh for every outbound call and consumed when sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    params: BTreeMap<String, String>,
    sign: String,
}

impl SignedRequest {
    /// Sign `params`. A stray `sign` entry in the input is dropped first so it
    /// never feeds into its own signature.
    pub fn new(api_secret: &str, mut params: BTreeMap<String, String>) -> Self {
        params.remove(SIGN_PARAM);
        let sign = sign_params(
            api_secret,
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );
        Self { params, sign }
    }

    pub fn sign(&self) -> &str {
        &self.sign
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if key == SIGN_PARAM {
            return Some(&self.sign);
        }
        self.params.get(key).map(String::as_str)
    }

    /// Signed parameters, excluding `sign`, in key order.
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Form body: the signed parameters in key order followed by `sign`.
    pub fn into_form(self) -> Vec<(String, String)> {
        let mut form: Vec<(String, String)> = self.params.into_iter().collect();
        form.push((SIGN_PARAM.to_string(), self.sign));
        form
    }
}
