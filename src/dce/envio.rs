use crate::core::{
    ChaveAcesso, Dce, DfeError, DocumentoFiscal, Endereco, Item, validar, validation_failure,
};

use super::xml_utils::XmlWriter;
use super::{DCE_NS, DCE_VERSAO};

/// Serialize a document into the canonical `enviDCe` batch XML, unsigned.
///
/// The element order is fixed by the authority schema and must not vary.
/// Validation runs first: a document with a missing mandatory field fails
/// with [`DfeError::Validation`] before any XML is emitted — partial output
/// is never returned. The access key is recomputed here, never cached.
pub fn to_envi_xml(dce: &Dce) -> Result<String, DfeError> {
    let errors = validar(dce);
    if !errors.is_empty() {
        return Err(validation_failure(&errors));
    }

    let chave = ChaveAcesso::gerar(dce)?;
    let id = format!("DCe{chave}");

    let mut w = XmlWriter::new()?;
    w.start_element_with_attrs("enviDCe", &[("xmlns", DCE_NS), ("versao", DCE_VERSAO)])?;
    w.text_element("idLote", &dce.lote.to_string())?;
    w.start_element("DCe")?;
    w.start_element_with_attrs("infDCe", &[("versao", DCE_VERSAO), ("Id", &id)])?;

    escrever_ide(&mut w, dce, &chave)?;
    escrever_remetente(&mut w, dce)?;
    escrever_destinatario(&mut w, dce)?;
    for (i, item) in dce.itens.iter().enumerate() {
        escrever_item(&mut w, item, i + 1)?;
    }

    w.start_element("total")?;
    w.decimal_element("vDC", dce.valor_total, 2)?;
    w.end_element("total")?;

    w.start_element("transp")?;
    w.text_element("modFrete", &dce.modalidade_frete.to_string())?;
    w.end_element("transp")?;

    // infAdic is omitted entirely when there is nothing to carry
    if let Some(rastreio) = dce.codigo_rastreio.as_deref().filter(|r| !r.trim().is_empty()) {
        w.start_element("infAdic")?;
        w.text_element("infCpl", &format!("Código de Rastreio: {rastreio}"))?;
        w.end_element("infAdic")?;
    }

    w.end_element("infDCe")?;
    w.end_element("DCe")?;
    w.end_element("enviDCe")?;
    w.into_string()
}

fn escrever_ide(w: &mut XmlWriter, dce: &Dce, chave: &ChaveAcesso) -> Result<(), DfeError> {
    w.start_element("ide")?;
    w.text_element("cUF", &dce.uf.to_string())?;
    w.text_element("cDC", &dce.codigo_numerico.to_string())?;
    w.text_element("mod", &dce.modelo.code().to_string())?;
    w.text_element("serie", &dce.serie.to_string())?;
    w.text_element("nDC", &format!("{:09}", dce.numero))?;
    w.text_element("dhEmi", &dce.emissao.format("%Y-%m-%dT%H:%M:%S").to_string())?;
    w.text_element("tpEmis", &dce.tipo_emissao.code().to_string())?;
    // the check digit is re-extracted from the key, not recomputed
    w.text_element("cDV", &chave.digito_verificador().to_string())?;
    w.text_element("tpAmb", &dce.ambiente.code().to_string())?;
    w.text_element("finDCe", &dce.finalidade.to_string())?;
    w.text_element("procEmi", &dce.processo_emissao.to_string())?;
    w.text_element("verProc", &dce.versao_aplicativo)?;
    w.end_element("ide")?;
    Ok(())
}

fn escrever_remetente(w: &mut XmlWriter, dce: &Dce) -> Result<(), DfeError> {
    w.start_element("rem")?;
    w.text_element("CNPJ", &dce.remetente.cnpj)?;
    w.text_element("xNome", &dce.remetente.nome)?;
    escrever_endereco(w, "enderRem", &dce.remetente.endereco)?;
    w.end_element("rem")?;
    Ok(())
}

fn escrever_destinatario(w: &mut XmlWriter, dce: &Dce) -> Result<(), DfeError> {
    w.start_element("dest")?;
    match &dce.destinatario.documento {
        DocumentoFiscal::Cnpj(d) => w.text_element("CNPJ", d)?,
        DocumentoFiscal::Cpf(d) => w.text_element("CPF", d)?,
    };
    w.text_element("xNome", &dce.destinatario.nome)?;
    escrever_endereco(w, "enderDest", &dce.destinatario.endereco)?;
    w.end_element("dest")?;
    Ok(())
}

fn escrever_endereco(w: &mut XmlWriter, tag: &str, endereco: &Endereco) -> Result<(), DfeError> {
    w.start_element(tag)?;
    w.text_element("xLgr", &endereco.logradouro)?;
    w.text_element("nro", &endereco.numero)?;
    w.opt_text_element("xCpl", endereco.complemento.as_deref())?;
    w.text_element("xBairro", &endereco.bairro)?;
    w.text_element("cMun", &endereco.codigo_municipio)?;
    w.text_element("xMun", &endereco.municipio)?;
    w.text_element("UF", &endereco.uf)?;
    w.text_element("CEP", &somente_digitos(&endereco.cep))?;
    w.end_element(tag)?;
    Ok(())
}

fn escrever_item(w: &mut XmlWriter, item: &Item, n: usize) -> Result<(), DfeError> {
    let n = n.to_string();
    w.start_element_with_attrs("det", &[("nItem", n.as_str())])?;
    w.start_element("prod")?;
    w.text_element("cProd", &item.codigo)?;
    w.text_element("xProd", &item.descricao)?;
    w.text_element("NCM", &item.ncm)?;
    w.decimal_element("qCom", item.quantidade, 4)?;
    w.decimal_element("vUnCom", item.valor_unitario, 2)?;
    w.decimal_element("vProd", item.valor_total, 2)?;
    w.end_element("prod")?;
    w.end_element("det")?;
    Ok(())
}

fn somente_digitos(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}
