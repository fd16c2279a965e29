//! 44-digit access key (chave de acesso) generation.
//!
//! Layout: UF(2) + AAMM(4) + CNPJ(14) + modelo(2) + série(3) + número(9) +
//! tpEmis(1) + código numérico(8) + DV(1). The check digit is modulo-11 over
//! cyclic weights 2..=9, per the SEFAZ layout manual for DF-e documents.

use std::fmt;

use super::error::DfeError;
use super::types::Dce;

/// Total key length including the check digit.
pub const CHAVE_LEN: usize = 44;

/// Offset of the check digit within the key.
pub const DV_OFFSET: usize = 43;

/// A derived 44-digit access key.
///
/// Never stored on a [`Dce`] — always recomputed from the document fields so
/// the identifier embedded in the XML is guaranteed consistent with the
/// content. Generation is a deterministic pure function of the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChaveAcesso(String);

impl ChaveAcesso {
    /// Generate the access key for a document.
    ///
    /// The sender CNPJ must be exactly 14 digits: it is mandatory for key
    /// generation regardless of whether it is rendered elsewhere, and a
    /// wrong-length value is an error, never silently zero-padded.
    pub fn gerar(dce: &Dce) -> Result<Self, DfeError> {
        let cnpj = dce.remetente.cnpj.as_str();
        if cnpj.len() != 14 || !cnpj.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DfeError::Chave(format!(
                "remetente.cnpj must be exactly 14 digits, got {:?}",
                cnpj
            )));
        }

        let mut corpo = String::with_capacity(CHAVE_LEN);
        corpo.push_str(&format!("{:02}", dce.uf));
        corpo.push_str(&dce.emissao.format("%y%m").to_string());
        corpo.push_str(cnpj);
        corpo.push_str(&format!("{:02}", dce.modelo.code()));
        corpo.push_str(&format!("{:03}", dce.serie));
        corpo.push_str(&format!("{:09}", dce.numero));
        corpo.push_str(&format!("{}", dce.tipo_emissao.code()));
        corpo.push_str(&format!("{:08}", dce.codigo_numerico));
        debug_assert_eq!(corpo.len(), DV_OFFSET);

        let dv = calcular_dv(&corpo)?;
        corpo.push(char::from(b'0' + dv));
        Ok(Self(corpo))
    }

    /// The key as a 44-character digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The check digit character, at the fixed offset 43.
    pub fn digito_verificador(&self) -> char {
        self.0.as_bytes()[DV_OFFSET] as char
    }
}

impl fmt::Display for ChaveAcesso {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChaveAcesso {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Modulo-11 check digit over a digit string.
///
/// Weights cycle 2..=9 starting at 2 on the rightmost digit and increasing
/// leftward. `dv = 11 - (sum % 11)`; results of 0, 1 or ≥ 10 collapse to 0.
pub fn calcular_dv(corpo: &str) -> Result<u8, DfeError> {
    if corpo.is_empty() {
        return Err(DfeError::Chave("empty digit string".into()));
    }

    let mut soma: u64 = 0;
    let mut peso: u64 = 2;
    for b in corpo.bytes().rev() {
        if !b.is_ascii_digit() {
            return Err(DfeError::Chave(format!(
                "non-digit character {:?} in key body",
                b as char
            )));
        }
        soma += u64::from(b - b'0') * peso;
        peso += 1;
        if peso > 9 {
            peso = 2;
        }
    }

    let dv = 11 - (soma % 11);
    if dv <= 1 || dv >= 10 { Ok(0) } else { Ok(dv as u8) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dv_reference_body() {
        let corpo = "3525123402831600010359001000000001112345678";
        assert_eq!(corpo.len(), DV_OFFSET);
        assert_eq!(calcular_dv(corpo).unwrap(), 6);
    }

    #[test]
    fn dv_collapses_to_zero() {
        // Same document, numeric codes chosen so 11 - (sum % 11) lands on
        // each collapse case: 11, 1 and 10 all become check digit 0.
        let base = "35251234028316000103590010000000011";
        for cdc in ["00000004", "00000009", "00000013"] {
            let corpo = format!("{base}{cdc}");
            assert_eq!(calcular_dv(&corpo).unwrap(), 0, "cDC {cdc}");
        }
    }

    #[test]
    fn dv_raw_one_becomes_zero() {
        // 11 - (sum % 11) == 1 must collapse, not be emitted as digit 1.
        let corpo = "3525123402831600010359001000000001100000009";
        assert_eq!(calcular_dv(corpo).unwrap(), 0);
    }

    #[test]
    fn dv_rejects_non_digits() {
        assert!(calcular_dv("12a4").is_err());
        assert!(calcular_dv("").is_err());
    }

    #[test]
    fn dv_single_digit() {
        // 1 * 2 = 2; 11 - 2 = 9.
        assert_eq!(calcular_dv("1").unwrap(), 9);
        // 0 -> sum 0 -> 11 - 0 = 11 -> collapses to 0.
        assert_eq!(calcular_dv("0").unwrap(), 0);
    }
}
