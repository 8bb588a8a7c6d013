//! Request Encoding
//!
//! Turns arguments into query strings and request bodies:
//! - `form`: URL-encoded forms and query strings
//! - `multipart`: `multipart/form-data` bodies with collision-checked boundaries
//! - `url`: resolving paths beneath the service root

pub mod form;
pub mod multipart;
pub mod url;

pub use form::{encode_form, parse_form};
pub use multipart::{MultipartBody, encode_multipart, generate_boundary};
pub use url::{append_query, normalize_base_url, resolve};

use crate::defaults::content_types::FORM_URL_ENCODED;
use crate::error::ProxyError;
use crate::types::{Arguments, Encoding};

/// A request body produced from arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: String,
    pub content: Vec<u8>,
}

/// Encode arguments as a request body using the given mode.
pub fn encode_body(arguments: &Arguments, encoding: Encoding) -> Result<EncodedBody, ProxyError> {
    match encoding {
        Encoding::FormUrlEncoded => Ok(EncodedBody {
            content_type: FORM_URL_ENCODED.to_string(),
            content: encode_form(arguments)?.into_bytes(),
        }),
        Encoding::MultipartFormData => {
            let body = encode_multipart(arguments)?;
            Ok(EncodedBody {
                content_type: body.content_type(),
                content: body.content,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_mode_sets_form_content_type() {
        let args = Arguments::new().with("a", 1);
        let body = encode_body(&args, Encoding::FormUrlEncoded).unwrap();
        assert_eq!(body.content_type, "application/x-www-form-urlencoded");
        assert_eq!(body.content, b"a=1".to_vec());
    }

    #[test]
    fn multipart_mode_sets_boundary_content_type() {
        let args = Arguments::new().with("a", 1);
        let body = encode_body(&args, Encoding::MultipartFormData).unwrap();
        let boundary = body
            .content_type
            .strip_prefix("multipart/form-data; boundary=")
            .expect("boundary parameter");
        assert!(body.content.starts_with(format!("--{boundary}\r\n").as_bytes()));
    }
}
