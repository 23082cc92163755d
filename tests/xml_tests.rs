//! Parse-then-validate tests over complete documents of every variant.
//!
//! Run with: `cargo test --test xml_tests`

#![cfg(feature = "xml")]

use nota::core::*;
use nota::rules::Validator;
use nota::xml::{detect_variant, parse_bytes, parse_document};
use rust_decimal_macros::dec;

const NFE_KEY: &str = "35240511222333000181550010000001231123456785";

const NFE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe" versao="4.00">
  <NFe>
    <infNFe Id="NFe35240511222333000181550010000001231123456785" versao="4.00">
      <ide>
        <cUF>35</cUF><natOp>Venda de mercadoria</natOp><mod>55</mod>
        <serie>1</serie><nNF>123</nNF><dhEmi>2024-05-10T10:00:00-03:00</dhEmi>
      </ide>
      <emit>
        <CNPJ>11222333000181</CNPJ><xNome>ACME Comercio Ltda</xNome><xFant>ACME</xFant>
        <enderEmit><xMun>São Paulo</xMun><UF>SP</UF><CEP>01310100</CEP></enderEmit>
        <IE>110042490114</IE><CRT>3</CRT>
      </emit>
      <dest>
        <CNPJ>98765432000198</CNPJ><xNome>Cliente Exemplo SA</xNome>
        <enderDest><xMun>Campinas</xMun><UF>SP</UF></enderDest>
      </dest>
      <det nItem="1">
        <prod>
          <cProd>P-001</cProd><xProd>Notebook</xProd><NCM>84713012</NCM><CFOP>5102</CFOP>
          <uCom>UN</uCom><qCom>10.0000</qCom><vUnCom>100.0000000000</vUnCom><vProd>1000.00</vProd>
        </prod>
        <imposto>
          <ICMS><ICMS00><orig>0</orig><CST>00</CST><modBC>3</modBC>
            <vBC>1000.00</vBC><pICMS>18.00</pICMS><vICMS>180.00</vICMS></ICMS00></ICMS>
          <IPI><cEnq>999</cEnq><IPITrib><CST>50</CST><vBC>1000.00</vBC>
            <pIPI>10.00</pIPI><vIPI>100.00</vIPI></IPITrib></IPI>
          <PIS><PISAliq><CST>01</CST><vBC>1000.00</vBC><pPIS>1.65</pPIS><vPIS>16.50</vPIS></PISAliq></PIS>
          <COFINS><COFINSAliq><CST>01</CST><vBC>1000.00</vBC><pCOFINS>7.60</pCOFINS>
            <vCOFINS>76.00</vCOFINS></COFINSAliq></COFINS>
        </imposto>
      </det>
      <total><ICMSTot>
        <vBC>1000.00</vBC><vICMS>180.00</vICMS><vST>0.00</vST><vProd>1000.00</vProd>
        <vFrete>0.00</vFrete><vSeg>0.00</vSeg><vDesc>0.00</vDesc><vIPI>100.00</vIPI>
        <vPIS>16.50</vPIS><vCOFINS>76.00</vCOFINS><vOutro>0.00</vOutro><vNF>1100.00</vNF>
      </ICMSTot></total>
    </infNFe>
  </NFe>
  <protNFe versao="4.00"><infProt>
    <chNFe>35240511222333000181550010000001231123456785</chNFe><cStat>100</cStat>
  </infProt></protNFe>
</nfeProc>"#;

const NFCE: &str = r#"<NFe xmlns="http://www.portalfiscal.inf.br/nfe">
  <infNFe Id="NFe35240511222333000181650010000004561123456785" versao="4.00">
    <ide><natOp>Venda ao consumidor</natOp><mod>65</mod><serie>1</serie><nNF>456</nNF>
      <dhEmi>2024-05-10T18:45:00-03:00</dhEmi></ide>
    <emit><CNPJ>11222333000181</CNPJ><xNome>ACME Comercio Ltda</xNome>
      <enderEmit><UF>SP</UF><CEP>01310-100</CEP></enderEmit><IE>110042490114</IE><CRT>1</CRT></emit>
    <det nItem="1">
      <prod><cProd>P-002</cProd><xProd>Caneta</xProd><NCM>96081000</NCM><CFOP>5102</CFOP>
        <uCom>UN</uCom><qCom>3</qCom><vUnCom>2,50</vUnCom><vProd>7,50</vProd></prod>
      <imposto><ICMS><ICMSSN102><orig>0</orig><CSOSN>102</CSOSN></ICMSSN102></ICMS>
        <PIS><PISNT><CST>07</CST></PISNT></PIS><COFINS><COFINSNT><CST>07</CST></COFINSNT></COFINS></imposto>
    </det>
    <total><ICMSTot><vProd>7.50</vProd><vNF>7.50</vNF></ICMSTot></total>
  </infNFe>
</NFe>"#;

const CTE: &str = r#"<cteProc xmlns="http://www.portalfiscal.inf.br/cte" versao="4.00">
  <CTe><infCte Id="CTe35240512345678000195570010000007891123456788" versao="4.00">
    <ide><CFOP>5353</CFOP><natOp>Prestacao de servico de transporte</natOp><mod>57</mod>
      <serie>1</serie><nCT>789</nCT><dhEmi>2024-05-02T08:30:00-03:00</dhEmi><modal>01</modal>
      <UFIni>SP</UFIni><UFFim>SP</UFFim></ide>
    <emit><CNPJ>12345678000195</CNPJ><IE>110042490114</IE><xNome>Transportes Rapido Ltda</xNome>
      <enderEmit><xMun>São Paulo</xMun><CEP>04538132</CEP><UF>SP</UF></enderEmit><CRT>3</CRT></emit>
    <dest><CNPJ>11222333000181</CNPJ><IE>110042490114</IE><xNome>ACME Comercio Ltda</xNome>
      <enderDest><UF>SP</UF></enderDest></dest>
    <vPrest><vTPrest>1500.00</vTPrest><vRec>1500.00</vRec></vPrest>
    <imp><ICMS><ICMS00><CST>00</CST><vBC>1500.00</vBC><pICMS>12.00</pICMS>
      <vICMS>180.00</vICMS></ICMS00></ICMS></imp>
    <infCTeNorm>
      <infCarga><vCarga>30000.00</vCarga>
        <infQ><cUnid>01</cUnid><tpMed>PESO BRUTO</tpMed><qCarga>1500.0000</qCarga></infQ></infCarga>
      <infModal versaoModal="4.00"><rodo><RNTRC>12345678</RNTRC>
        <veic><placa>ABC1234</placa></veic></rodo></infModal>
    </infCTeNorm>
  </infCte></CTe>
</cteProc>"#;

const MDFE: &str = r#"<mdfeProc xmlns="http://www.portalfiscal.inf.br/mdfe" versao="3.00">
  <MDFe><infMDFe Id="MDFe35240512345678000195580010000000421123456787" versao="3.00">
    <ide><mod>58</mod><serie>1</serie><nMDF>42</nMDF><modal>1</modal>
      <dhEmi>2024-05-03T06:00:00-03:00</dhEmi><UFIni>SP</UFIni><UFFim>BA</UFFim>
      <infPercurso><UFPer>MG</UFPer></infPercurso></ide>
    <emit><CNPJ>12345678000195</CNPJ><IE>110042490114</IE><xNome>Transportes Rapido Ltda</xNome>
      <enderEmit><CEP>04538132</CEP><UF>SP</UF></enderEmit></emit>
    <infModal versaoModal="3.00"><rodo><infANTT><RNTRC>12345678</RNTRC></infANTT>
      <veicTracao><placa>ABC1D23</placa><tara>8000</tara></veicTracao></rodo></infModal>
    <tot><qCTe>1</qCTe><vCarga>52000.00</vCarga><cUnid>02</cUnid><qCarga>12.5000</qCarga></tot>
  </infMDFe></MDFe>
</mdfeProc>"#;

#[test]
fn goods_invoice_scenario() {
    let (doc, issues) = Validator::default().check_xml(NFE).unwrap();

    assert_eq!(doc.document_type(), DocumentType::GoodsInvoice);
    assert_eq!(doc.access_key(), NFE_KEY);
    assert_eq!(doc.issuer().trade_name.as_deref(), Some("ACME"));
    assert_eq!(doc.items().len(), 1);
    let totals = doc.totals();
    assert_eq!(totals.products, dec!(1000.00));
    assert_eq!(totals.taxes, dec!(372.50));
    assert_eq!(totals.invoice_total, dec!(1100.00));
    assert_eq!(
        totals.tax_breakdown,
        TaxBreakdown {
            icms: dec!(180.00),
            icms_st: dec!(0),
            ipi: dec!(100.00),
            pis: dec!(16.50),
            cofins: dec!(76.00),
        }
    );

    let item = &doc.items()[0];
    assert_eq!(item.quantity, dec!(10));
    assert_eq!(item.tax_base, Some(dec!(1000.00)));
    assert_eq!(item.tax_rate, Some(dec!(18.00)));

    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn altered_access_key_is_one_error() {
    let altered = NFE_KEY.replacen("12345678", "12345679", 1);
    let xml = NFE.replace(NFE_KEY, &altered);
    let (_, issues) = Validator::default().check_xml(&xml).unwrap();

    let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
    assert_eq!(errors.len(), 1, "{issues:?}");
    assert_eq!(errors[0].code, "ID-03");
}

#[test]
fn consumer_invoice_with_comma_decimals() {
    let (doc, issues) = Validator::default().check_xml(NFCE).unwrap();
    assert_eq!(doc.document_type(), DocumentType::ConsumerInvoice);
    assert_eq!(doc.items()[0].unit_price, dec!(2.50));
    assert_eq!(doc.items()[0].line_total, dec!(7.50));
    assert_eq!(doc.header().tax_regime, Some(TaxRegime::SimplesNacional));
    assert!(doc.recipient().is_none());
    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn waybill_parses_clean() {
    let (doc, issues) = Validator::default().check_xml(CTE).unwrap();
    assert_eq!(doc.document_type(), DocumentType::TransportWaybill);
    let t = doc.transport().unwrap();
    assert_eq!(t.vehicle_plate.as_deref(), Some("ABC1234"));
    assert_eq!(t.cargo_weight, Some(dec!(1500)));
    assert_eq!(t.origin.as_deref(), Some("SP"));
    assert_eq!(doc.totals().tax_breakdown.icms, dec!(180.00));
    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn waybill_plate_in_wrong_order() {
    let xml = CTE.replace("<placa>ABC1234</placa>", "<placa>1234ABC</placa>");
    let (_, issues) = Validator::default().check_xml(&xml).unwrap();
    assert_eq!(issues.len(), 1, "{issues:?}");
    assert_eq!(issues[0].code, "TRN-03");
    assert_eq!(issues[0].severity, Severity::Warning);
}

#[test]
fn manifest_parses_clean() {
    let (doc, issues) = Validator::default().check_xml(MDFE).unwrap();
    assert_eq!(doc.document_type(), DocumentType::TransportManifest);
    let t = doc.transport().unwrap();
    assert_eq!(t.modal, "01");
    assert_eq!(t.route, ["MG"]);
    assert_eq!(t.cargo_weight, Some(dec!(12500)));
    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn manifest_route_through_endpoint() {
    let xml = MDFE.replace(
        "<infPercurso><UFPer>MG</UFPer></infPercurso>",
        "<infPercurso><UFPer>MG</UFPer></infPercurso><infPercurso><UFPer>BA</UFPer></infPercurso>",
    );
    let (_, issues) = Validator::default().check_xml(&xml).unwrap();
    let codes: Vec<_> = issues.iter().map(|i| i.code.as_str()).collect();
    assert_eq!(codes, ["JUR-05"]);
}

#[test]
fn every_variant_is_detected() {
    assert_eq!(detect_variant(NFE).unwrap(), DocumentType::GoodsInvoice);
    assert_eq!(detect_variant(NFCE).unwrap(), DocumentType::ConsumerInvoice);
    assert_eq!(detect_variant(CTE).unwrap(), DocumentType::TransportWaybill);
    assert_eq!(detect_variant(MDFE).unwrap(), DocumentType::TransportManifest);
}

#[test]
fn bytes_with_bom() {
    let mut bytes = "\u{feff}".as_bytes().to_vec();
    bytes.extend_from_slice(MDFE.as_bytes());
    let doc = parse_bytes(&bytes).unwrap();
    assert_eq!(doc.document_type(), DocumentType::TransportManifest);
}

#[test]
fn non_utf8_bytes_are_malformed() {
    assert!(matches!(
        parse_bytes(&[0x3c, 0xff, 0xfe, 0x3e]),
        Err(ParseError::Malformed(_))
    ));
}

#[test]
fn documents_without_namespace_still_parse() {
    let xml = CTE.replace(r#" xmlns="http://www.portalfiscal.inf.br/cte""#, "");
    let doc = parse_document(&xml).unwrap();
    assert_eq!(doc.transport().unwrap().carrier_registration.as_deref(), Some("12345678"));
}

#[test]
fn unsupported_documents() {
    assert_eq!(
        parse_document("<Invoice><ID>1</ID></Invoice>").unwrap_err(),
        ParseError::UnsupportedVariant("Invoice".into())
    );
    let nfse_model = NFE.replace("<mod>55</mod>", "<mod>99</mod>");
    assert!(matches!(
        parse_document(&nfse_model),
        Err(ParseError::UnsupportedVariant(_))
    ));
}

#[test]
fn malformed_markup() {
    let truncated = &NFE[..NFE.len() / 2];
    assert!(matches!(parse_document(truncated), Err(ParseError::Malformed(_))));
}

#[test]
fn missing_issuer_block() {
    let start = MDFE.find("<emit>").unwrap();
    let end = MDFE.find("</emit>").unwrap() + "</emit>".len();
    let xml = format!("{}{}", &MDFE[..start], &MDFE[end..]);
    assert_eq!(
        parse_document(&xml).unwrap_err(),
        ParseError::MissingField("emit".into())
    );
}

#[test]
fn unreadable_date() {
    let xml = CTE.replace("2024-05-02T08:30:00-03:00", "02/05/2024");
    assert!(matches!(
        parse_document(&xml),
        Err(ParseError::InvalidValue { field, .. }) if field == "dhEmi"
    ));
}

const DECIMAL_MAX: &str = "79228162514264337593543950335";

#[test]
fn quantity_at_decimal_limit_is_reported_not_fatal() {
    let xml = NFE
        .replace("<qCom>10.0000</qCom>", &format!("<qCom>{DECIMAL_MAX}</qCom>"))
        .replace("<vUnCom>100.0000000000</vUnCom>", "<vUnCom>2</vUnCom>");
    let (document, issues) = Validator::default().check_xml(&xml).unwrap();
    assert_eq!(document.items()[0].line_total, dec!(1000.00));
    assert!(issues.iter().any(|i| i.code == "ARI-01"), "{issues:?}");
    assert!(!has_errors(&issues));
}

#[test]
fn cargo_weight_at_decimal_limit() {
    let xml = CTE.replace(
        "<cUnid>01</cUnid><tpMed>PESO BRUTO</tpMed><qCarga>1500.0000</qCarga>",
        &format!("<cUnid>02</cUnid><tpMed>PESO BRUTO</tpMed><qCarga>{DECIMAL_MAX}</qCarga>"),
    );
    assert!(matches!(
        parse_document(&xml),
        Err(ParseError::InvalidValue { field, .. }) if field == "infQ/qCarga"
    ));
}

#[test]
fn deeply_nested_input_is_malformed() {
    let xml = format!("<NFe>{}{}</NFe>", "<a>".repeat(200_000), "</a>".repeat(200_000));
    assert_eq!(
        parse_document(&xml).unwrap_err(),
        ParseError::Malformed("nesting too deep".into())
    );
}
