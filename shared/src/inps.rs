//! Ingestion of INPS sick-certificate records.
//!
//! Records are turned into [`LeaveRequest`]s once, when the dataset is
//! loaded. The rest of the crate only ever sees the canonical shape.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::date_utils::{days_between_inclusive, parse_iso_date};
use crate::error::LeaveAdminError;
use crate::{
    Address, CertificateDetails, CertificateRef, Department, LeaveRequest, LeaveStatus, MooreaMeta,
    MooreaObj, Reachability, Task, NO_DEPARTMENT_LABEL, SICK_LEAVE_TYPE_ID, SICK_LEAVE_TYPE_NAME,
};

/// Ids of ingested requests start here
pub const ID_OFFSET: i64 = 1000;
pub const HOURS_PER_DAY: f64 = 8.0;
pub const MINUTES_PER_DAY: i64 = 480;
pub const NEUTRAL_DEPARTMENT_COLOR: &str = "#E1E5E9";

/// One record of the `items` array of the certificate dataset
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InpsCertificate {
    #[serde(deserialize_with = "crate::loose_text::deserialize")]
    pub lav_cf: Option<String>,
    #[serde(deserialize_with = "crate::loose_text::deserialize")]
    pub lav_nome: Option<String>,
    #[serde(deserialize_with = "crate::loose_text::deserialize")]
    pub lav_cognome: Option<String>,
    #[serde(rename = "dataInizio", deserialize_with = "crate::loose_text::deserialize")]
    pub data_inizio: Option<String>,
    #[serde(rename = "dataFine", deserialize_with = "crate::loose_text::deserialize")]
    pub data_fine: Option<String>,
    #[serde(rename = "tipoCertificato", deserialize_with = "crate::loose_text::deserialize")]
    pub tipo_certificato: Option<String>,
    #[serde(rename = "tipoVisita", deserialize_with = "crate::loose_text::deserialize")]
    pub tipo_visita: Option<String>,
    #[serde(rename = "dataRilascio", deserialize_with = "crate::loose_text::deserialize")]
    pub data_rilascio: Option<String>,
    #[serde(rename = "idCertificato", deserialize_with = "crate::loose_text::deserialize")]
    pub id_certificato: Option<String>,
    #[serde(deserialize_with = "crate::loose_text::deserialize")]
    pub medico_cf: Option<String>,
    #[serde(deserialize_with = "crate::loose_text::deserialize")]
    pub medico_nome: Option<String>,
    #[serde(deserialize_with = "crate::loose_text::deserialize")]
    pub medico_cognome: Option<String>,
    #[serde(rename = "medico_codiceRegione", deserialize_with = "crate::loose_text::deserialize")]
    pub medico_codice_regione: Option<String>,
    #[serde(rename = "medico_codiceAsl", deserialize_with = "crate::loose_text::deserialize")]
    pub medico_codice_asl: Option<String>,
    #[serde(rename = "ruoloMedico", deserialize_with = "crate::loose_text::deserialize")]
    pub ruolo_medico: Option<String>,
    #[serde(rename = "matricolaINPS", deserialize_with = "crate::loose_text::deserialize")]
    pub matricola_inps: Option<String>,
    #[serde(deserialize_with = "crate::loose_text::deserialize")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "crate::loose_text::deserialize")]
    pub updated_at: Option<String>,
    pub residenza: Option<Address>,
    pub reperibilita: Option<Reachability>,
    #[serde(rename = "giornataLavorata", deserialize_with = "loose_flag")]
    pub giornata_lavorata: bool,
    #[serde(deserialize_with = "loose_flag")]
    pub trauma: bool,
    #[serde(deserialize_with = "crate::loose_text::deserialize")]
    pub agevolazioni: Option<String>,
    #[serde(deserialize_with = "crate::loose_text::deserialize")]
    pub profile_pic: Option<String>,
}

/// Parse the dataset document and transform every record.
///
/// The document must be an object with an `items` array. Records that
/// cannot be read are skipped; the others keep their position-based id.
pub fn parse_dataset(json: &str) -> Result<Vec<LeaveRequest>, LeaveAdminError> {
    let document: Value = serde_json::from_str(json)?;
    let items = document
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| LeaveAdminError::InvalidDataset("array `items` mancante".to_string()))?;

    let mut requests = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match InpsCertificate::deserialize(item) {
            Ok(certificate) => requests.push(transform_certificate(&certificate, index)),
            Err(e) => log::warn!("Certificato {} ignorato: {}", index, e),
        }
    }

    log::info!("Caricati {} certificati di malattia", requests.len());
    Ok(requests)
}

/// Map one INPS record to a canonical sick-leave request
pub fn transform_certificate(cert: &InpsCertificate, index: usize) -> LeaveRequest {
    let start = cert.data_inizio.as_deref().and_then(parse_iso_date);
    let end = cert.data_fine.as_deref().and_then(parse_iso_date);
    let days = match (start, end) {
        (Some(start), Some(end)) => days_between_inclusive(start, end),
        _ => 1,
    };

    let type_label = cert
        .tipo_certificato
        .as_deref()
        .map(|code| certificate_type_label(Some(code)).to_string())
        .unwrap_or_default();

    let moorea_obj = MooreaObj {
        meta: Some(MooreaMeta {
            days: Some(days as f64),
            hours: Some(days as f64 * HOURS_PER_DAY),
            certificate_details_txt: Some(format!("{} giorni di malattia - {}", days, type_label)),
        }),
        certificates: vec![CertificateRef {
            id_certificato: cert.id_certificato.clone(),
            data_inizio: cert.data_inizio.clone(),
            data_fine: cert.data_fine.clone(),
            tipo_certificato: cert.tipo_certificato.clone(),
            tipo_visita: cert.tipo_visita.clone(),
            data_rilascio: cert.data_rilascio.clone(),
            giorni: Some(days),
        }],
    };

    let doctor = join_name(cert.medico_nome.as_deref(), cert.medico_cognome.as_deref());

    LeaveRequest {
        id: index as i64 + ID_OFFSET,
        employee_name: join_name(cert.lav_nome.as_deref(), cert.lav_cognome.as_deref()),
        fiscal_code: cert.lav_cf.clone(),
        profile_pic: cert.profile_pic.clone(),
        department: Department {
            id: None,
            name: Some(NO_DEPARTMENT_LABEL.to_string()),
            color: Some(NEUTRAL_DEPARTMENT_COLOR.to_string()),
        },
        task: Task::default(),
        type_id: SICK_LEAVE_TYPE_ID,
        type_name: SICK_LEAVE_TYPE_NAME.to_string(),
        status: LeaveStatus::Approved,
        data_inizio: cert.data_inizio.clone(),
        data_fine: cert.data_fine.clone(),
        note: cert
            .id_certificato
            .as_ref()
            .map(|id| format!("Certificato INPS {}", id)),
        moorea_obj: Some(moorea_obj),
        certificate: Some(CertificateDetails {
            id_certificato: cert.id_certificato.clone(),
            tipo_certificato: cert.tipo_certificato.clone(),
            tipo_visita: cert.tipo_visita.clone(),
            ruolo_medico: cert.ruolo_medico.clone(),
            medico_nome: (!doctor.is_empty()).then_some(doctor),
            medico_cf: cert.medico_cf.clone(),
            medico_codice_regione: cert.medico_codice_regione.clone(),
            medico_codice_asl: cert.medico_codice_asl.clone(),
            matricola_inps: cert.matricola_inps.clone(),
            data_rilascio: cert.data_rilascio.clone(),
            residenza: cert.residenza.clone(),
            reperibilita: cert.reperibilita.clone(),
            giornata_lavorata: cert.giornata_lavorata,
            trauma: cert.trauma,
            agevolazioni: cert.agevolazioni.clone(),
        }),
        created_at: cert.created_at.clone(),
        updated_at: cert.updated_at.clone(),
    }
}

/// `tipoCertificato` label, "Malattia" when the code is unknown
pub fn certificate_type_label(code: Option<&str>) -> &'static str {
    match code {
        Some("I") => "Inizio",
        Some("C") => "Continuazione",
        Some("R") => "Ricaduta",
        Some("A") => "Annullato",
        _ => "Malattia",
    }
}

/// `tipoVisita` label, "N/D" when the code is unknown
pub fn visit_type_label(code: Option<&str>) -> &'static str {
    match code {
        Some("A") => "Ambulatoriale",
        Some("D") => "Domiciliare",
        Some("P") => "Pronto Soccorso",
        _ => "N/D",
    }
}

pub fn doctor_role_label(code: Option<&str>) -> &'static str {
    match code {
        Some("S") => "Medico SSN",
        Some("P") => "Libero Professionista",
        _ => "N/D",
    }
}

/// `agevolazioni` label; unknown codes are shown verbatim
pub fn benefit_label(code: &str) -> String {
    match code {
        "T" => "Terapia Salvavita".to_string(),
        "C" => "Causa di Servizio".to_string(),
        "I" => "Invalidità Riconosciuta".to_string(),
        other => other.to_string(),
    }
}

/// `via, civico - cap comune (prov)`
pub fn format_address(address: Option<&Address>) -> String {
    let Some(address) = address else {
        return "Indirizzo non presente".to_string();
    };
    let via = address.via.as_deref().unwrap_or("");
    let civico = address
        .civico
        .as_deref()
        .filter(|civico| !civico.is_empty())
        .map(|civico| format!(", {}", civico))
        .unwrap_or_default();
    format!(
        "{}{} - {} {} ({})",
        via,
        civico,
        address.cap.as_deref().unwrap_or(""),
        address.comune.as_deref().unwrap_or(""),
        address.provincia.as_deref().unwrap_or("")
    )
}

fn join_name(first: Option<&str>, last: Option<&str>) -> String {
    [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flags arrive as booleans, 0/1 or "S"/"N"
fn loose_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(number)) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Some(Value::String(text)) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "s" | "si" | "true" | "1" | "y"
        ),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r##"{
        "items": [
            {
                "lav_cf": "RSSMRA80A01H501U",
                "lav_nome": "Mario",
                "lav_cognome": "Rossi",
                "dataInizio": "2025-01-20",
                "dataFine": "2025-01-24",
                "tipoCertificato": "I",
                "tipoVisita": "A",
                "dataRilascio": "2025-01-20",
                "idCertificato": "123456789",
                "medico_nome": "Luca",
                "medico_cognome": "Bianchi",
                "matricolaINPS": "0001",
                "giornataLavorata": "S",
                "trauma": false
            },
            {
                "lav_nome": "Anna",
                "lav_cognome": "Verdi",
                "dataInizio": "2025-02-03",
                "dataFine": "2025-02-03",
                "tipoCertificato": "C"
            }
        ]
    }"##;

    #[test]
    fn test_parse_dataset_transforms_items() {
        let requests = parse_dataset(DATASET).unwrap();
        assert_eq!(requests.len(), 2);

        let first = &requests[0];
        assert_eq!(first.id, 1000);
        assert_eq!(first.employee_name, "Mario Rossi");
        assert_eq!(first.status, LeaveStatus::Approved);
        assert_eq!(first.type_id, SICK_LEAVE_TYPE_ID);
        assert_eq!(first.type_name, "MALATTIA");
        assert_eq!(first.department.name.as_deref(), Some(NO_DEPARTMENT_LABEL));
        assert_eq!(first.note.as_deref(), Some("Certificato INPS 123456789"));

        let meta = first.moorea_obj.as_ref().unwrap().meta.as_ref().unwrap();
        assert_eq!(meta.days, Some(5.0));
        assert_eq!(meta.hours, Some(40.0));
        assert_eq!(
            meta.certificate_details_txt.as_deref(),
            Some("5 giorni di malattia - Inizio")
        );

        let details = first.certificate.as_ref().unwrap();
        assert_eq!(details.medico_nome.as_deref(), Some("Luca Bianchi"));
        assert!(details.giornata_lavorata);
        assert!(!details.trauma);

        assert_eq!(requests[1].id, 1001);
        let meta = requests[1].moorea_obj.as_ref().unwrap().meta.as_ref().unwrap();
        assert_eq!(meta.days, Some(1.0));
    }

    #[test]
    fn test_parse_dataset_tolerates_numeric_fields() {
        let json = r#"{
            "items": [
                {
                    "lav_nome": "Mario",
                    "lav_cognome": "Rossi",
                    "dataInizio": "2025-01-20",
                    "dataFine": "2025-01-21",
                    "idCertificato": "A1"
                },
                {
                    "lav_nome": "Anna",
                    "lav_cognome": "Verdi",
                    "dataInizio": "2025-01-22",
                    "dataFine": "2025-01-22",
                    "idCertificato": 2025012202,
                    "residenza": {"via": "Via Roma", "civico": 12, "cap": 20100}
                },
                {
                    "lav_nome": "Paolo",
                    "residenza": "non un indirizzo"
                }
            ]
        }"#;

        let requests = parse_dataset(json).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].employee_name, "Mario Rossi");

        let anna = &requests[1];
        assert_eq!(anna.id, 1001);
        assert_eq!(anna.note.as_deref(), Some("Certificato INPS 2025012202"));
        let residenza = anna.certificate.as_ref().unwrap().residenza.as_ref().unwrap();
        assert_eq!(residenza.civico.as_deref(), Some("12"));
        assert_eq!(residenza.cap.as_deref(), Some("20100"));
        assert_eq!(residenza.comune, None);
    }

    #[test]
    fn test_parse_dataset_requires_items_array() {
        assert!(matches!(
            parse_dataset(r#"{"data": []}"#),
            Err(LeaveAdminError::InvalidDataset(_))
        ));
        assert!(matches!(
            parse_dataset(r#"{"items": {}}"#),
            Err(LeaveAdminError::InvalidDataset(_))
        ));
        assert!(matches!(parse_dataset("not json"), Err(LeaveAdminError::Parse(_))));
    }

    #[test]
    fn test_code_tables() {
        assert_eq!(certificate_type_label(Some("R")), "Ricaduta");
        assert_eq!(certificate_type_label(Some("X")), "Malattia");
        assert_eq!(certificate_type_label(None), "Malattia");
        assert_eq!(visit_type_label(Some("P")), "Pronto Soccorso");
        assert_eq!(visit_type_label(None), "N/D");
        assert_eq!(doctor_role_label(Some("S")), "Medico SSN");
        assert_eq!(benefit_label("T"), "Terapia Salvavita");
        assert_eq!(benefit_label("Z"), "Z");
    }

    #[test]
    fn test_format_address() {
        let address = Address {
            via: Some("Via Roma".to_string()),
            civico: Some("12".to_string()),
            cap: Some("00100".to_string()),
            comune: Some("Roma".to_string()),
            provincia: Some("RM".to_string()),
        };
        assert_eq!(format_address(Some(&address)), "Via Roma, 12 - 00100 Roma (RM)");
        assert_eq!(format_address(None), "Indirizzo non presente");

        let without_number = Address { civico: None, ..address };
        assert_eq!(format_address(Some(&without_number)), "Via Roma - 00100 Roma (RM)");
    }
}
