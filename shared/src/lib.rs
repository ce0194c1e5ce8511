use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

pub mod calendar;
pub mod color;
pub mod config;
pub mod date_utils;
pub mod error;
pub mod filters;
pub mod inps;
pub mod list;
pub mod period;
pub mod presentation;
pub mod state;

pub use config::AdminConfig;
pub use error::LeaveAdminError;

/// Numeric type id used for sick leave ("MALATTIA")
pub const SICK_LEAVE_TYPE_ID: i64 = 1;
pub const SICK_LEAVE_TYPE_NAME: &str = "MALATTIA";
/// Label used when a request carries no (complete) department
pub const NO_DEPARTMENT_LABEL: &str = "Nessun reparto";

/// A single sick-leave request as the UI consumes it.
///
/// This is the canonical shape produced once at ingestion time
/// (see [`inps::transform_certificate`]); nothing downstream looks at
/// alternative field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: i64,
    /// Full employee name ("nominativo")
    pub employee_name: String,
    pub fiscal_code: Option<String>,
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub department: Department,
    #[serde(default)]
    pub task: Task,
    pub type_id: i64,
    pub type_name: String,
    pub status: LeaveStatus,
    /// Start date, ISO `YYYY-MM-DD`
    #[serde(rename = "dataInizio")]
    pub data_inizio: Option<String>,
    /// End date, ISO `YYYY-MM-DD`
    #[serde(rename = "dataFine")]
    pub data_fine: Option<String>,
    pub note: Option<String>,
    pub moorea_obj: Option<MooreaObj>,
    /// INPS certificate details shown in the detail card
    pub certificate: Option<CertificateDetails>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Department ("reparto") attached to a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Task ("mansione") attached to a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Approval status: 0 = pending, 1 = approved, 2 = rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl From<u8> for LeaveStatus {
    fn from(value: u8) -> Self {
        match value {
            1 => LeaveStatus::Approved,
            2 => LeaveStatus::Rejected,
            _ => LeaveStatus::Pending,
        }
    }
}

impl From<LeaveStatus> for u8 {
    fn from(status: LeaveStatus) -> Self {
        match status {
            LeaveStatus::Pending => 0,
            LeaveStatus::Approved => 1,
            LeaveStatus::Rejected => 2,
        }
    }
}

/// Nested leave payload kept from the upstream leave system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MooreaObj {
    pub meta: Option<MooreaMeta>,
    #[serde(default)]
    pub certificates: Vec<CertificateRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MooreaMeta {
    pub days: Option<f64>,
    pub hours: Option<f64>,
    pub certificate_details_txt: Option<String>,
}

/// One certificate period inside `moorea_obj.certificates`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateRef {
    #[serde(rename = "idCertificato")]
    pub id_certificato: Option<String>,
    #[serde(rename = "dataInizio")]
    pub data_inizio: Option<String>,
    #[serde(rename = "dataFine")]
    pub data_fine: Option<String>,
    #[serde(rename = "tipoCertificato")]
    pub tipo_certificato: Option<String>,
    #[serde(rename = "tipoVisita")]
    pub tipo_visita: Option<String>,
    #[serde(rename = "dataRilascio")]
    pub data_rilascio: Option<String>,
    pub giorni: Option<i64>,
}

/// INPS certificate fields used by the detail card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateDetails {
    pub id_certificato: Option<String>,
    /// I, C, R or A
    pub tipo_certificato: Option<String>,
    /// A, D or P
    pub tipo_visita: Option<String>,
    /// S or P
    pub ruolo_medico: Option<String>,
    pub medico_nome: Option<String>,
    pub medico_cf: Option<String>,
    pub medico_codice_regione: Option<String>,
    pub medico_codice_asl: Option<String>,
    pub matricola_inps: Option<String>,
    pub data_rilascio: Option<String>,
    pub residenza: Option<Address>,
    pub reperibilita: Option<Reachability>,
    #[serde(default)]
    pub giornata_lavorata: bool,
    #[serde(default)]
    pub trauma: bool,
    pub agevolazioni: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, deserialize_with = "loose_text::deserialize")]
    pub via: Option<String>,
    #[serde(default, deserialize_with = "loose_text::deserialize")]
    pub civico: Option<String>,
    #[serde(default, deserialize_with = "loose_text::deserialize")]
    pub cap: Option<String>,
    #[serde(default, deserialize_with = "loose_text::deserialize")]
    pub comune: Option<String>,
    #[serde(default, deserialize_with = "loose_text::deserialize")]
    pub provincia: Option<String>,
}

/// Address where the employee can be reached during the sick leave
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reachability {
    #[serde(default, deserialize_with = "loose_text::deserialize")]
    pub cognome: Option<String>,
    pub indirizzo: Option<Address>,
}

impl LeaveRequest {
    /// Whether the request is a sick-leave request
    pub fn is_sick_leave(&self) -> bool {
        self.type_id == SICK_LEAVE_TYPE_ID || self.type_name == SICK_LEAVE_TYPE_NAME
    }

    /// Department name used for grouping, `None` when missing or blank
    pub fn department_name(&self) -> Option<&str> {
        self.department
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Effective date range: root `dataInizio`..`dataFine`, falling back to the
    /// earliest certificate start and the latest certificate end.
    pub fn effective_range(&self) -> Option<(NaiveDate, Option<NaiveDate>)> {
        if let Some(start) = self.data_inizio.as_deref().and_then(date_utils::parse_iso_date) {
            let end = self.data_fine.as_deref().and_then(date_utils::parse_iso_date);
            return Some((start, end));
        }

        let certificates = &self.moorea_obj.as_ref()?.certificates;
        let mut spans: Vec<(NaiveDate, NaiveDate)> = certificates
            .iter()
            .filter_map(|cert| {
                let start = cert
                    .data_inizio
                    .as_deref()
                    .or(cert.data_fine.as_deref())
                    .and_then(date_utils::parse_iso_date)?;
                let end = cert
                    .data_fine
                    .as_deref()
                    .and_then(date_utils::parse_iso_date)
                    .unwrap_or(start);
                Some((start, end))
            })
            .collect();
        spans.sort_by_key(|(start, _)| *start);

        let first = spans.first()?.0;
        let last = spans.last().map(|(_, end)| *end);
        Some((first, last))
    }

    /// Dates on which a certificate of this request starts (or ends, when it has no start)
    pub fn certificate_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.moorea_obj
            .iter()
            .flat_map(|obj| obj.certificates.iter())
            .filter_map(|cert| {
                cert.data_inizio
                    .as_deref()
                    .or(cert.data_fine.as_deref())
                    .and_then(date_utils::parse_iso_date)
            })
    }
}

/// Payload of `GET /leave_admin_screen_config`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaveAdminScreenConfig {
    #[serde(default)]
    pub types: Vec<ConfigType>,
    #[serde(default)]
    pub blocks: Vec<ConfigBlock>,
    #[serde(default)]
    pub tasks: Vec<ConfigTask>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigType {
    #[serde(default, deserialize_with = "flexible_id::deserialize")]
    pub type_id: Option<i64>,
    pub type_name: Option<String>,
}

/// A department entry ("block") of the screen configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigBlock {
    #[serde(default, deserialize_with = "flexible_id::deserialize")]
    pub code: Option<i64>,
    pub pretty_name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigTask {
    #[serde(default, alias = "id", deserialize_with = "flexible_id::deserialize")]
    pub task_id: Option<i64>,
    #[serde(default, alias = "name", alias = "pretty_name")]
    pub task_name: Option<String>,
    pub color: Option<String>,
}

/// Sort direction of the leaves query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Parameters of the leaves query endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaveQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_inizio: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_fine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortDirection>,
}

impl LeaveQuery {
    /// Query-string pairs in the order the endpoint documents them
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(nome) = &self.nome {
            pairs.push(("nome", nome.clone()));
        }
        if let Some(type_id) = self.type_id {
            pairs.push(("type_id", type_id.to_string()));
        }
        if let Some(department_id) = self.department_id {
            pairs.push(("department_id", department_id.to_string()));
        }
        if let Some(task_id) = self.task_id {
            pairs.push(("task_id", task_id.to_string()));
        }
        if let Some(data_inizio) = &self.data_inizio {
            pairs.push(("data_inizio", data_inizio.clone()));
        }
        if let Some(data_fine) = &self.data_fine {
            pairs.push(("data_fine", data_fine.clone()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sort_by", sort_by.clone()));
        }
        if let Some(sort_order) = self.sort_order {
            pairs.push(("sort_order", sort_order.as_str().to_string()));
        }
        pairs
    }
}

/// Envelope returned by the leaves query endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaveListResponse {
    #[serde(default)]
    pub items: Vec<LeaveRequest>,
}

/// Ids arrive either as JSON numbers or as numeric strings
mod flexible_id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawId>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawId::Number(id)) => Some(id),
            Some(RawId::Text(text)) => text.trim().parse().ok(),
            None => None,
        })
    }
}

/// Text fields of external records that sometimes arrive as numbers
pub(crate) mod loose_text {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(text)) => Some(text),
            Some(Value::Number(number)) => Some(number.to_string()),
            Some(Value::Bool(flag)) => Some(flag.to_string()),
            _ => None,
        })
    }
}
