use rust_decimal::Decimal;

use super::error::ValidationError;
use super::types::*;

/// Maximum digit widths fixed by the access-key layout.
const MAX_SERIE: u16 = 999;
const MAX_NUMERO: u32 = 999_999_999;
const MAX_CODIGO_NUMERICO: u32 = 99_999_999;

/// IBGE codes of the 27 federative units. The numbering has gaps, so a
/// range check is not enough.
const CODIGOS_UF: [u8; 27] = [
    11, 12, 13, 14, 15, 16, 17, // Norte
    21, 22, 23, 24, 25, 26, 27, 28, 29, // Nordeste
    31, 32, 33, 35, // Sudeste
    41, 42, 43, // Sul
    50, 51, 52, 53, // Centro-Oeste
];

/// Whether `codigo` is an assigned IBGE state code.
pub fn uf_valida(codigo: u8) -> bool {
    CODIGOS_UF.contains(&codigo)
}

/// Validate a DC-e against the layout's structural rules.
/// Returns all validation errors found (not just the first).
///
/// A failing document must never reach serialization or the wire: the XML
/// builder runs this first and aborts before emitting any output.
pub fn validar(dce: &Dce) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !uf_valida(dce.uf) {
        errors.push(ValidationError::new(
            "uf",
            format!("{} is not an assigned IBGE UF code", dce.uf),
        ));
    }

    if dce.serie > MAX_SERIE {
        errors.push(ValidationError::new(
            "serie",
            format!("series {} exceeds 3 digits", dce.serie),
        ));
    }

    if dce.numero > MAX_NUMERO {
        errors.push(ValidationError::new(
            "numero",
            format!("document number {} exceeds 9 digits", dce.numero),
        ));
    }

    if dce.codigo_numerico > MAX_CODIGO_NUMERICO {
        errors.push(ValidationError::new(
            "codigo_numerico",
            format!("numeric code {} exceeds 8 digits", dce.codigo_numerico),
        ));
    }

    if dce.versao_aplicativo.trim().is_empty() {
        errors.push(ValidationError::new(
            "versao_aplicativo",
            "application version must not be empty",
        ));
    }

    validar_digitos(&dce.remetente.cnpj, 14, "remetente.cnpj", &mut errors);
    if dce.remetente.nome.trim().is_empty() {
        errors.push(ValidationError::new(
            "remetente.nome",
            "sender name must not be empty",
        ));
    }
    validar_endereco(&dce.remetente.endereco, "remetente.endereco", &mut errors);

    // Mutual exclusivity of CNPJ/CPF is guaranteed by the enum;
    // only the digit shape needs checking here.
    let doc = &dce.destinatario.documento;
    let campo = match doc {
        DocumentoFiscal::Cnpj(_) => "destinatario.cnpj",
        DocumentoFiscal::Cpf(_) => "destinatario.cpf",
    };
    validar_digitos(doc.digitos(), doc.largura(), campo, &mut errors);
    if dce.destinatario.nome.trim().is_empty() {
        errors.push(ValidationError::new(
            "destinatario.nome",
            "recipient name must not be empty",
        ));
    }
    validar_endereco(
        &dce.destinatario.endereco,
        "destinatario.endereco",
        &mut errors,
    );

    if dce.itens.is_empty() {
        errors.push(ValidationError::new(
            "itens",
            "document must have at least one item",
        ));
    }
    for (i, item) in dce.itens.iter().enumerate() {
        validar_item(item, i, &mut errors);
    }

    // vDC must equal the item sum within 2-decimal rounding tolerance
    let soma: Decimal = dce.itens.iter().map(|i| i.valor_total).sum();
    if (dce.valor_total - soma).abs().round_dp(2) != Decimal::ZERO {
        errors.push(ValidationError::new(
            "valor_total",
            format!(
                "document total {} does not match item sum {}",
                dce.valor_total, soma
            ),
        ));
    }

    errors
}

fn validar_item(item: &Item, index: usize, errors: &mut Vec<ValidationError>) {
    let campo = |nome: &str| format!("itens[{index}].{nome}");

    if item.codigo.trim().is_empty() {
        errors.push(ValidationError::new(
            campo("codigo"),
            "product code must not be empty",
        ));
    }
    if item.descricao.trim().is_empty() {
        errors.push(ValidationError::new(
            campo("descricao"),
            "description must not be empty",
        ));
    }
    if item.ncm.trim().is_empty() {
        errors.push(ValidationError::new(
            campo("ncm"),
            "NCM classification code must not be empty",
        ));
    }
    if item.quantidade <= Decimal::ZERO {
        errors.push(ValidationError::new(
            campo("quantidade"),
            "quantity must be positive",
        ));
    }
    if item.valor_unitario < Decimal::ZERO {
        errors.push(ValidationError::new(
            campo("valor_unitario"),
            "unit price must not be negative",
        ));
    }

    // vProd = qCom × vUnCom within the 2-decimal formatting tolerance
    let esperado = (item.quantidade * item.valor_unitario).round_dp(2);
    if (item.valor_total - esperado).abs().round_dp(2) != Decimal::ZERO {
        errors.push(ValidationError::new(
            campo("valor_total"),
            format!(
                "line total {} does not match quantidade × valor_unitario = {}",
                item.valor_total, esperado
            ),
        ));
    }
}

fn validar_endereco(endereco: &Endereco, prefixo: &str, errors: &mut Vec<ValidationError>) {
    let campo = |nome: &str| format!("{prefixo}.{nome}");

    if endereco.logradouro.trim().is_empty() {
        errors.push(ValidationError::new(
            campo("logradouro"),
            "street must not be empty",
        ));
    }
    if endereco.numero.trim().is_empty() {
        errors.push(ValidationError::new(
            campo("numero"),
            "street number must not be empty",
        ));
    }
    if endereco.bairro.trim().is_empty() {
        errors.push(ValidationError::new(
            campo("bairro"),
            "district must not be empty",
        ));
    }
    if endereco.codigo_municipio.trim().is_empty() {
        errors.push(ValidationError::new(
            campo("codigo_municipio"),
            "municipality code must not be empty",
        ));
    }
    if endereco.municipio.trim().is_empty() {
        errors.push(ValidationError::new(
            campo("municipio"),
            "municipality must not be empty",
        ));
    }
    if endereco.uf.trim().len() != 2 {
        errors.push(ValidationError::new(
            campo("uf"),
            "UF must be a 2-letter abbreviation",
        ));
    }
    let cep_digits = endereco.cep.chars().filter(char::is_ascii_digit).count();
    if cep_digits != 8 {
        errors.push(ValidationError::new(
            campo("cep"),
            format!("CEP must contain 8 digits, got {cep_digits}"),
        ));
    }
}

fn validar_digitos(valor: &str, largura: usize, campo: &str, errors: &mut Vec<ValidationError>) {
    if valor.len() != largura || !valor.bytes().all(|b| b.is_ascii_digit()) {
        errors.push(ValidationError::new(
            campo,
            format!("must be exactly {largura} digits, got {valor:?}"),
        ));
    }
}
