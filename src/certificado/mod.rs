//! PKCS#12 (A1) digital certificate store.
//!
//! Loads a `.pfx`/`.p12` container, extracts the credential, checks the
//! certificate validity window, and prepares the TLS client identity used by
//! the SEFAZ transport. Loading is a construction-time factory: a
//! [`CertificadoDigital`] that exists is loaded and valid — there is no
//! "accessed before load" state to guard against. The passphrase is consumed
//! during the load and is not retained by the credential.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use p12::PFX;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while loading or using a PKCS#12 credential.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CertificadoError {
    /// The container file could not be read.
    #[error("failed to read PKCS#12 file: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a well-formed PKCS#12 container.
    #[error("invalid PKCS#12 container: {0}")]
    Formato(String),

    /// MAC verification failed — almost always a wrong passphrase.
    #[error("PKCS#12 passphrase is incorrect")]
    SenhaIncorreta,

    /// The container holds no certificate/key credential.
    #[error("no credential found in PKCS#12 container")]
    SemCredencial,

    /// No credential with the requested friendly name (alias).
    #[error("alias {0:?} not found in PKCS#12 container")]
    AliasNaoEncontrado(String),

    /// The certificate validity window has already closed.
    #[error("certificate expired on {valido_ate}")]
    Expirado { valido_ate: DateTime<Utc> },

    /// The certificate validity window has not opened yet.
    #[error("certificate not valid before {valido_de}")]
    NaoVigente { valido_de: DateTime<Utc> },

    /// The extracted material could not be turned into a TLS identity.
    #[error("TLS identity error: {0}")]
    Tls(String),
}

/// A loaded A1 digital certificate: X.509 certificate, private key, and the
/// derived TLS client identity.
///
/// Immutable after construction and safe for concurrent read-only use; the
/// transport layer clones the identity per client, no passphrase is needed
/// again at the TLS layer.
#[derive(Clone)]
pub struct CertificadoDigital {
    alias: Option<String>,
    titular: String,
    valido_de: DateTime<Utc>,
    valido_ate: DateTime<Utc>,
    cert_der: Vec<u8>,
    chave_privada_der: Vec<u8>,
    identity: reqwest::Identity,
}

impl fmt::Debug for CertificadoDigital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificadoDigital")
            .field("alias", &self.alias)
            .field("titular", &self.titular)
            .field("valido_de", &self.valido_de)
            .field("valido_ate", &self.valido_ate)
            .finish_non_exhaustive()
    }
}

impl CertificadoDigital {
    /// Load the first credential from a PKCS#12 file.
    ///
    /// When the container holds more than one credential the first
    /// enumerated one is used; prefer [`carregar_com_alias`] to make the
    /// choice explicit.
    ///
    /// [`carregar_com_alias`]: Self::carregar_com_alias
    pub fn carregar(caminho: impl AsRef<Path>, senha: &str) -> Result<Self, CertificadoError> {
        let caminho = caminho.as_ref();
        info!(caminho = %caminho.display(), "loading digital certificate");
        let bytes = std::fs::read(caminho)?;
        Self::carregar_der(&bytes, senha)
    }

    /// Load a credential selected by its friendly name (alias).
    pub fn carregar_com_alias(
        caminho: impl AsRef<Path>,
        senha: &str,
        alias: &str,
    ) -> Result<Self, CertificadoError> {
        let bytes = std::fs::read(caminho.as_ref())?;
        Self::carregar_der_com_alias(&bytes, senha, Some(alias))
    }

    /// Load the first credential from raw PKCS#12 DER bytes.
    pub fn carregar_der(bytes: &[u8], senha: &str) -> Result<Self, CertificadoError> {
        Self::carregar_der_com_alias(bytes, senha, None)
    }

    fn carregar_der_com_alias(
        bytes: &[u8],
        senha: &str,
        alias_desejado: Option<&str>,
    ) -> Result<Self, CertificadoError> {
        let pfx = PFX::parse(bytes)
            .map_err(|e| CertificadoError::Formato(format!("PFX parse: {e:?}")))?;

        if !pfx.verify_mac(senha) {
            return Err(CertificadoError::SenhaIncorreta);
        }

        let certs = pfx
            .cert_x509_bags(senha)
            .map_err(|e| CertificadoError::Formato(format!("cert bags: {e:?}")))?;
        let keys = pfx
            .key_bags(senha)
            .map_err(|e| CertificadoError::Formato(format!("key bags: {e:?}")))?;

        // Friendly names per bag kind, in enumeration order, so a chosen
        // alias selects the certificate and its own key, never credential 0's.
        let sacos = pfx
            .bags(senha)
            .map_err(|e| CertificadoError::Formato(format!("bags: {e:?}")))?;
        let aliases_cert: Vec<Option<String>> = sacos
            .iter()
            .filter(|b| matches!(b.bag, p12::SafeBagKind::CertBag(_)))
            .map(|b| b.friendly_name())
            .collect();
        let aliases_chave: Vec<Option<String>> = sacos
            .iter()
            .filter(|b| matches!(b.bag, p12::SafeBagKind::Pkcs8ShroudedKeyBag(_)))
            .map(|b| b.friendly_name())
            .collect();

        let (indice_cert, indice_chave) = match alias_desejado {
            Some(alias) => {
                let cert_i = aliases_cert
                    .iter()
                    .position(|a| a.as_deref() == Some(alias))
                    .ok_or_else(|| CertificadoError::AliasNaoEncontrado(alias.to_string()))?;
                let chave_i = match aliases_chave
                    .iter()
                    .position(|a| a.as_deref() == Some(alias))
                {
                    Some(i) => i,
                    // a lone key is unambiguous even without a matching name
                    None if keys.len() == 1 => 0,
                    None => {
                        return Err(CertificadoError::AliasNaoEncontrado(alias.to_string()));
                    }
                };
                (cert_i, chave_i)
            }
            None => (0, 0),
        };

        let cert_der = certs
            .get(indice_cert)
            .ok_or(CertificadoError::SemCredencial)?
            .clone();
        let chave_privada_der = keys
            .get(indice_chave)
            .ok_or(CertificadoError::SemCredencial)?
            .clone();
        let alias = aliases_cert.get(indice_cert).cloned().flatten();

        let (_, cert) = x509_parser::parse_x509_certificate(&cert_der)
            .map_err(|e| CertificadoError::Formato(format!("X.509 parse: {e}")))?;
        let titular = cert.subject().to_string();
        let valido_de = timestamp_utc(cert.validity().not_before.timestamp());
        let valido_ate = timestamp_utc(cert.validity().not_after.timestamp());

        let agora = Utc::now();
        if agora > valido_ate {
            return Err(CertificadoError::Expirado { valido_ate });
        }
        if agora < valido_de {
            return Err(CertificadoError::NaoVigente { valido_de });
        }

        // rustls wants key and certificate as PEM blocks in one buffer
        let chave_pem = pem::encode(&pem::Pem::new("PRIVATE KEY", chave_privada_der.clone()));
        let cert_pem = pem::encode(&pem::Pem::new("CERTIFICATE", cert_der.clone()));
        let identity = reqwest::Identity::from_pem(format!("{chave_pem}{cert_pem}").as_bytes())
            .map_err(|e| CertificadoError::Tls(e.to_string()))?;

        debug!(?alias, "certificate bags extracted");
        info!(titular = %titular, valido_ate = %valido_ate, "digital certificate loaded");

        Ok(Self {
            alias,
            titular,
            valido_de,
            valido_ate,
            cert_der,
            chave_privada_der,
            identity,
        })
    }

    /// Friendly name of the loaded credential, when the container carries one.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Subject of the certificate (the credential holder).
    pub fn titular(&self) -> &str {
        &self.titular
    }

    /// Start of the certificate validity window.
    pub fn valido_de(&self) -> DateTime<Utc> {
        self.valido_de
    }

    /// End of the certificate validity window.
    pub fn valido_ate(&self) -> DateTime<Utc> {
        self.valido_ate
    }

    /// DER-encoded X.509 certificate, for the external signing collaborator.
    pub fn certificado_der(&self) -> &[u8] {
        &self.cert_der
    }

    /// DER-encoded PKCS#8 private key, for the external signing collaborator.
    pub fn chave_privada_der(&self) -> &[u8] {
        &self.chave_privada_der
    }

    /// TLS client identity for mutual authentication. No passphrase is
    /// required here — it was consumed during loading.
    pub fn identity(&self) -> reqwest::Identity {
        self.identity.clone()
    }
}

fn timestamp_utc(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}
