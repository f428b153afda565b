use base64::{Engine as _, engine::general_purpose::STANDARD};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use scraper::{Html, Selector};
use tracing::{debug, trace};

use crate::constants::{AWS_ROLE_ATTRIBUTE, SAML_ASSERTION_NS, SAML_RESPONSE_FIELD};
use crate::error::{Error, NotFoundKind, Result};
use crate::roles::RoleArnPair;

/// HTML page returned by the app link, carrying the SAMLResponse form
#[derive(Debug, Clone)]
pub struct FederationDocument(String);

impl FederationDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Find the `SAMLResponse` input and return its base64 `value`.
pub fn extract_assertion(document: &FederationDocument) -> Option<String> {
    let html = Html::parse_document(document.as_str());
    let selector = Selector::parse("input").ok()?;

    html.select(&selector)
        .find(|input| input.value().attr("name") == Some(SAML_RESPONSE_FIELD))
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
}

/// Decode the assertion and return the role pair whose role ARN contains `role_name`.
pub fn resolve_role_arn(base64_assertion: &str, role_name: &str) -> Result<RoleArnPair> {
    SamlResponse::from_base64(base64_assertion)?.find_role(role_name)
}

/// Decoded SAML response (provider-independent)
#[derive(Debug)]
pub struct SamlResponse {
    encoded: String,
    decoded_xml: Vec<u8>,
}

impl SamlResponse {
    /// Create from Base64-encoded response
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let compact: String = encoded
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let decoded = STANDARD
            .decode(&compact)
            .map_err(|e| Error::MalformedAssertion(format!("invalid base64: {e}")))?;
        trace!("Decoded SAML response: {} bytes", decoded.len());

        Ok(Self {
            encoded: compact,
            decoded_xml: decoded,
        })
    }

    /// Extract the assertion from a federation document.
    pub fn from_document(document: &FederationDocument) -> Result<Self> {
        let encoded = extract_assertion(document).ok_or_else(|| {
            Error::MalformedAssertion(format!(
                "no {SAML_RESPONSE_FIELD} field in federation document"
            ))
        })?;
        Self::from_base64(&encoded)
    }

    /// Values of every `saml:AttributeValue` under the `saml:Attribute` named `attribute_name`
    pub fn get_attribute_values(&self, attribute_name: &str) -> Result<Vec<String>> {
        let mut reader = NsReader::from_reader(self.decoded_xml.as_slice());
        reader.config_mut().trim_text(true);

        let mut values = Vec::new();
        let mut in_target_attribute = false;
        let mut current_value: Option<String> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_resolved_event_into(&mut buf) {
                Ok((ns, Event::Start(e))) if is_assertion_ns(&ns) => {
                    match e.local_name().as_ref() {
                        b"Attribute" => {
                            in_target_attribute = check_attribute_name(&e, attribute_name);
                        }
                        b"AttributeValue" if in_target_attribute => {
                            current_value = Some(String::new());
                        }
                        _ => {}
                    }
                }
                Ok((_, Event::Text(e))) => {
                    if let Some(value) = current_value.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::MalformedAssertion(e.to_string()))?;
                        value.push_str(&text);
                    }
                }
                Ok((_, Event::CData(e))) => {
                    if let Some(value) = current_value.as_mut() {
                        value.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Ok((ns, Event::End(e))) if is_assertion_ns(&ns) => {
                    match e.local_name().as_ref() {
                        b"AttributeValue" => {
                            if let Some(value) = current_value.take() {
                                values.push(value.trim().to_string());
                            }
                        }
                        b"Attribute" => in_target_attribute = false,
                        _ => {}
                    }
                }
                Ok((_, Event::Eof)) => break,
                Err(e) => {
                    return Err(Error::MalformedAssertion(format!(
                        "error parsing SAML response: {e}"
                    )));
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(values)
    }

    /// Every role pair in the assertion, in document order
    pub fn roles(&self) -> Result<Vec<RoleArnPair>> {
        let values = self.get_attribute_values(AWS_ROLE_ATTRIBUTE)?;
        debug!("Found {} role values in SAML assertion", values.len());

        Ok(values
            .iter()
            .filter_map(|value| RoleArnPair::parse(value))
            .collect())
    }

    /// First role whose role ARN contains `role_name` (substring, not equality)
    pub fn find_role(&self, role_name: &str) -> Result<RoleArnPair> {
        self.roles()?
            .into_iter()
            .find(|pair| pair.role_arn.contains(role_name))
            .ok_or_else(|| Error::NotFound {
                kind: NotFoundKind::Role,
                name: role_name.to_string(),
            })
    }

    /// The pair whose role ARN equals `role_arn`
    pub fn find_role_arn(&self, role_arn: &str) -> Result<RoleArnPair> {
        self.roles()?
            .into_iter()
            .find(|pair| pair.role_arn == role_arn)
            .ok_or_else(|| Error::NotFound {
                kind: NotFoundKind::Role,
                name: role_arn.to_string(),
            })
    }

    /// The base64 form, as handed to the credential exchange
    pub fn as_base64(&self) -> &str {
        &self.encoded
    }

    /// Get the raw decoded XML content
    pub fn as_bytes(&self) -> &[u8] {
        &self.decoded_xml
    }
}

fn is_assertion_ns(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == SAML_ASSERTION_NS.as_bytes())
}

/// Check if the attribute element has the specified name
fn check_attribute_name(e: &BytesStart, attribute_name: &str) -> bool {
    e.attributes().filter_map(|a| a.ok()).any(|attr| {
        attr.key.as_ref() == b"Name" && attr.value.as_ref() == attribute_name.as_bytes()
    })
}
