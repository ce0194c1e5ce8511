//! Presentation rules for a single request: avatar, badges, quantity,
//! date text, status icon and the detail card view.

use crate::color::contrast_text_color;
use crate::date_utils::{
    days_between_inclusive, format_date_ddmmyy, format_date_italian, format_quantity,
    normalize_quantity, parse_iso_date, QuantityUnit,
};
use crate::inps::{benefit_label, certificate_type_label, doctor_role_label, format_address, visit_type_label};
use crate::{Department, LeaveRequest, LeaveStatus, Task, NO_DEPARTMENT_LABEL, SICK_LEAVE_TYPE_NAME};

pub const AVATAR_BASE_URL: &str = "https://i.pravatar.cc/43?img=";
/// Number of distinct avatars available
pub const AVATAR_POOL: u32 = 70;
pub const NEUTRAL_BADGE_BACKGROUND: &str = "#E1E5E9";
pub const NEUTRAL_BADGE_TEXT: &str = "#666666";

/// Java-style string hash over UTF-16 code units, 32-bit wrapping
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// Avatar number in `1..=70` derived from the name
pub fn avatar_seed(name: &str) -> u32 {
    (name_hash(name) % AVATAR_POOL as i32).unsigned_abs() + 1
}

pub fn avatar_url_for_seed(seed: u32) -> String {
    format!("{}{}", AVATAR_BASE_URL, seed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarSource {
    Picture(String),
    Seeded(u32),
    /// No picture and no name: the caller picks a random avatar
    Random,
}

impl AvatarSource {
    pub fn for_request(request: &LeaveRequest) -> Self {
        if let Some(picture) = request.profile_pic.as_deref().filter(|pic| !pic.trim().is_empty()) {
            return AvatarSource::Picture(picture.to_string());
        }
        if request.employee_name.trim().is_empty() {
            AvatarSource::Random
        } else {
            AvatarSource::Seeded(avatar_seed(&request.employee_name))
        }
    }

    /// Resolve to a URL; `random_seed` is only called for [`AvatarSource::Random`]
    pub fn url(&self, random_seed: impl FnOnce() -> u32) -> String {
        match self {
            AvatarSource::Picture(url) => url.clone(),
            AvatarSource::Seeded(seed) => avatar_url_for_seed(*seed),
            AvatarSource::Random => avatar_url_for_seed(random_seed().clamp(1, AVATAR_POOL)),
        }
    }
}

/// Text and colors of a badge; no colors means the stylesheet default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeStyle {
    pub text: String,
    pub background: Option<String>,
    pub foreground: Option<String>,
}

impl BadgeStyle {
    fn colored(text: &str, background: &str) -> Self {
        Self {
            text: text.to_string(),
            background: Some(background.to_string()),
            foreground: Some(contrast_text_color(background).to_string()),
        }
    }

    pub fn inline_style(&self) -> Option<String> {
        match (&self.background, &self.foreground) {
            (Some(bg), Some(fg)) => Some(format!("background-color: {}; color: {};", bg, fg)),
            (Some(bg), None) => Some(format!("background-color: {};", bg)),
            _ => None,
        }
    }
}

/// Department badge; needs id, name and color, else the neutral "Nessun reparto" badge
pub fn department_badge(department: &Department) -> BadgeStyle {
    let name = department.name.as_deref().map(str::trim).filter(|name| !name.is_empty());
    let color = department.color.as_deref().map(str::trim).filter(|color| !color.is_empty());
    match (department.id, name, color) {
        (Some(_), Some(name), Some(color)) => BadgeStyle::colored(name, color),
        _ => BadgeStyle {
            text: NO_DEPARTMENT_LABEL.to_string(),
            background: Some(NEUTRAL_BADGE_BACKGROUND.to_string()),
            foreground: Some(NEUTRAL_BADGE_TEXT.to_string()),
        },
    }
}

/// Task badge, only when the task has a name
pub fn task_badge(task: &Task) -> Option<BadgeStyle> {
    let name = task.name.as_deref().map(str::trim).filter(|name| !name.is_empty())?;
    Some(match task.color.as_deref().filter(|color| !color.trim().is_empty()) {
        Some(color) => BadgeStyle::colored(name, color),
        None => BadgeStyle {
            text: name.to_string(),
            background: None,
            foreground: None,
        },
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBadge {
    pub label: String,
    pub is_sick_leave: bool,
}

impl TypeBadge {
    pub fn for_request(request: &LeaveRequest) -> Self {
        let label = if request.type_name.trim().is_empty() {
            SICK_LEAVE_TYPE_NAME.to_string()
        } else {
            request.type_name.clone()
        };
        Self {
            label,
            is_sick_leave: request.is_sick_leave(),
        }
    }

    pub fn css_classes(&self) -> Vec<&'static str> {
        let mut classes = vec!["request-type-badge"];
        if self.is_sick_leave {
            classes.push("badge-malattia");
        }
        classes
    }
}

/// `3` + `giorni`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityDisplay {
    pub number: String,
    pub label: &'static str,
}

/// Day quantity from `moorea_obj.meta.days`, rounded to whole days
pub fn quantity_display(request: &LeaveRequest) -> Option<QuantityDisplay> {
    let days = request.moorea_obj.as_ref()?.meta.as_ref()?.days?;
    let number = format_quantity(normalize_quantity(days, QuantityUnit::Days));
    let label = if number == "1" { "giorno" } else { "giorni" };
    Some(QuantityDisplay { number, label })
}

/// Date block of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateText {
    /// `Il 22/01/25`
    Single(String),
    /// `Da 22/01/25 a 24/01/25`
    Range { start: String, end: String },
}

impl std::fmt::Display for DateText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateText::Single(day) => write!(f, "Il {}", day),
            DateText::Range { start, end } => write!(f, "Da {} a {}", start, end),
        }
    }
}

pub fn date_text(request: &LeaveRequest) -> Option<DateText> {
    let (start, end) = match request.data_inizio.as_deref().filter(|raw| !raw.trim().is_empty()) {
        Some(raw_start) => {
            let start = format_date_ddmmyy(raw_start);
            let end = request
                .data_fine
                .as_deref()
                .filter(|raw| !raw.trim().is_empty())
                .map(format_date_ddmmyy)
                .unwrap_or_else(|| start.clone());
            (start, end)
        }
        None => {
            let (first, last) = request.effective_range()?;
            let start = first.format("%d/%m/%y").to_string();
            let end = last.unwrap_or(first).format("%d/%m/%y").to_string();
            (start, end)
        }
    };

    Some(if start == end {
        DateText::Single(start)
    } else {
        DateText::Range { start, end }
    })
}

/// Long form for the row tooltip: `Da Mer 18 Dic a Mar 24 Dic`
pub fn date_tooltip(request: &LeaveRequest) -> Option<String> {
    let (start, end) = request.effective_range()?;
    Some(match end.filter(|end| *end != start) {
        Some(end) => format!("Da {} a {}", format_date_italian(start), format_date_italian(end)),
        None => format_date_italian(start),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Approved,
    Rejected,
    Blank,
}

impl From<LeaveStatus> for StatusIcon {
    fn from(status: LeaveStatus) -> Self {
        match status {
            LeaveStatus::Approved => StatusIcon::Approved,
            LeaveStatus::Rejected => StatusIcon::Rejected,
            LeaveStatus::Pending => StatusIcon::Blank,
        }
    }
}

impl StatusIcon {
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            StatusIcon::Approved => Some("status-approved"),
            StatusIcon::Rejected => Some("status-rejected"),
            StatusIcon::Blank => None,
        }
    }

    pub fn icon_class(&self) -> Option<&'static str> {
        match self {
            StatusIcon::Approved => Some("bi bi-check-lg"),
            StatusIcon::Rejected => Some("bi bi-x-lg"),
            StatusIcon::Blank => None,
        }
    }
}

/// Everything the sickness detail card shows
#[derive(Debug, Clone, PartialEq)]
pub struct SicknessCardView {
    pub request_id: i64,
    pub employee_name: String,
    pub avatar: AvatarSource,
    pub department: BadgeStyle,
    pub task: Option<BadgeStyle>,
    pub certificate_type: &'static str,
    /// `dal 22/01/25 al 24/01/25`
    pub period_text: String,
    /// `5 giorni`
    pub duration_text: String,
    /// `40 ore`
    pub hours_text: Option<String>,
    pub protocol: String,
    pub doctor: String,
    pub doctor_role: &'static str,
    pub visit_type: &'static str,
    pub residence: String,
    pub reachability: String,
    /// `(Presso: Rossi)`
    pub reachability_contact: Option<String>,
    pub flags: Vec<String>,
    pub release_date: String,
}

impl SicknessCardView {
    pub fn from_request(request: &LeaveRequest) -> Self {
        let certificate = request.certificate.clone().unwrap_or_default();
        let placeholder = "--/--/--";
        let start_text = request
            .data_inizio
            .as_deref()
            .map(format_date_ddmmyy)
            .unwrap_or_else(|| placeholder.to_string());
        let end_text = request
            .data_fine
            .as_deref()
            .map(format_date_ddmmyy)
            .unwrap_or_else(|| placeholder.to_string());

        let meta = request.moorea_obj.as_ref().and_then(|obj| obj.meta.as_ref());
        let days = meta
            .and_then(|meta| meta.days)
            .filter(|days| *days > 0.0)
            .map(|days| normalize_quantity(days, QuantityUnit::Days))
            .unwrap_or_else(|| inclusive_days(request) as f64);
        let hours_text = meta
            .and_then(|meta| meta.hours)
            .map(|hours| format!("{} ore", format_quantity(normalize_quantity(hours, QuantityUnit::Hours))));

        let reachability_address = certificate
            .reperibilita
            .as_ref()
            .and_then(|reach| reach.indirizzo.as_ref());
        let reachability = match reachability_address {
            Some(address) => format_address(Some(address)),
            None => "Coincide con residenza".to_string(),
        };
        let reachability_contact = reachability_address
            .and(certificate.reperibilita.as_ref())
            .and_then(|reach| reach.cognome.as_deref())
            .filter(|name| !name.trim().is_empty())
            .map(|name| format!("(Presso: {})", name));

        let mut flags = Vec::new();
        if certificate.giornata_lavorata {
            flags.push("Giornata Lavorata".to_string());
        }
        if certificate.trauma {
            flags.push("Trauma".to_string());
        }
        if let Some(code) = certificate.agevolazioni.as_deref().filter(|code| !code.is_empty()) {
            flags.push(benefit_label(code));
        }

        Self {
            request_id: request.id,
            employee_name: request.employee_name.clone(),
            avatar: AvatarSource::for_request(request),
            department: department_badge(&request.department),
            task: task_badge(&request.task),
            certificate_type: certificate_type_label(certificate.tipo_certificato.as_deref()),
            period_text: format!("dal {} al {}", start_text, end_text),
            duration_text: format!("{} giorni", format_quantity(days)),
            hours_text,
            protocol: certificate.id_certificato.clone().unwrap_or_else(|| "---".to_string()),
            doctor: certificate.medico_nome.clone().unwrap_or_else(|| "N/D".to_string()),
            doctor_role: doctor_role_label(certificate.ruolo_medico.as_deref()),
            visit_type: visit_type_label(certificate.tipo_visita.as_deref()),
            residence: format_address(certificate.residenza.as_ref()),
            reachability,
            reachability_contact,
            flags,
            release_date: certificate
                .data_rilascio
                .as_deref()
                .map(format_date_ddmmyy)
                .filter(|date| !date.is_empty())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

fn inclusive_days(request: &LeaveRequest) -> i64 {
    let start = request.data_inizio.as_deref().and_then(parse_iso_date);
    let end = request.data_fine.as_deref().and_then(parse_iso_date);
    match (start, end) {
        (Some(start), Some(end)) => days_between_inclusive(start, end),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{TEXT_BLACK, TEXT_WHITE};
    use crate::{Address, CertificateDetails, CertificateRef, MooreaMeta, MooreaObj, Reachability};

    fn request(name: &str) -> LeaveRequest {
        LeaveRequest {
            id: 1000,
            employee_name: name.to_string(),
            fiscal_code: None,
            profile_pic: None,
            department: Department::default(),
            task: Task::default(),
            type_id: 1,
            type_name: "MALATTIA".to_string(),
            status: LeaveStatus::Approved,
            data_inizio: Some("2025-01-22".to_string()),
            data_fine: Some("2025-01-24".to_string()),
            note: None,
            moorea_obj: Some(MooreaObj {
                meta: Some(MooreaMeta {
                    days: Some(3.0),
                    hours: Some(24.0),
                    certificate_details_txt: None,
                }),
                certificates: vec![],
            }),
            certificate: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_name_hash_matches_java_style_hash() {
        assert_eq!(name_hash(""), 0);
        assert_eq!(name_hash("a"), 97);
        assert_eq!(name_hash("ab"), 97 * 31 + 98);
        // overflows wrap around instead of panicking
        let long = "Mario Rossi Bianchi Verdi Esposito".repeat(4);
        let _ = name_hash(&long);
    }

    #[test]
    fn test_avatar_seed_is_deterministic_and_in_range() {
        let seed = avatar_seed("Mario Rossi");
        assert_eq!(seed, avatar_seed("Mario Rossi"));
        assert!((1..=AVATAR_POOL).contains(&seed));
        // 97 % 70 + 1
        assert_eq!(avatar_seed("a"), 28);
    }

    #[test]
    fn test_avatar_source() {
        let mut with_picture = request("Mario Rossi");
        with_picture.profile_pic = Some("https://example.org/me.png".to_string());
        assert_eq!(
            AvatarSource::for_request(&with_picture).url(|| 1),
            "https://example.org/me.png"
        );

        let seeded = AvatarSource::for_request(&request("a"));
        assert_eq!(seeded, AvatarSource::Seeded(28));
        assert_eq!(seeded.url(|| 1), "https://i.pravatar.cc/43?img=28");

        let anonymous = AvatarSource::for_request(&request("  "));
        assert_eq!(anonymous, AvatarSource::Random);
        assert_eq!(anonymous.url(|| 5), "https://i.pravatar.cc/43?img=5");
    }

    #[test]
    fn test_department_badge_requires_all_fields() {
        let complete = Department {
            id: Some(3),
            name: Some("Cucina".to_string()),
            color: Some("#000000".to_string()),
        };
        let badge = department_badge(&complete);
        assert_eq!(badge.text, "Cucina");
        assert_eq!(badge.foreground.as_deref(), Some(TEXT_WHITE));

        let missing_color = Department { color: None, ..complete.clone() };
        let badge = department_badge(&missing_color);
        assert_eq!(badge.text, NO_DEPARTMENT_LABEL);
        assert_eq!(badge.background.as_deref(), Some(NEUTRAL_BADGE_BACKGROUND));
        assert_eq!(badge.foreground.as_deref(), Some(NEUTRAL_BADGE_TEXT));

        let missing_id = Department { id: None, ..complete };
        assert_eq!(department_badge(&missing_id).text, NO_DEPARTMENT_LABEL);
    }

    #[test]
    fn test_task_badge() {
        assert!(task_badge(&Task::default()).is_none());

        let plain = task_badge(&Task { id: None, name: Some("Cuoco".to_string()), color: None }).unwrap();
        assert_eq!(plain.inline_style(), None);

        let colored = task_badge(&Task {
            id: Some(1),
            name: Some("Barista".to_string()),
            color: Some("#FFFFFF".to_string()),
        })
        .unwrap();
        assert_eq!(colored.foreground.as_deref(), Some(TEXT_BLACK));
        assert_eq!(
            colored.inline_style().as_deref(),
            Some("background-color: #FFFFFF; color: #000000;")
        );
    }

    #[test]
    fn test_type_badge() {
        let badge = TypeBadge::for_request(&request("Mario"));
        assert!(badge.css_classes().contains(&"badge-malattia"));

        let mut other = request("Mario");
        other.type_id = 2;
        other.type_name = String::new();
        let badge = TypeBadge::for_request(&other);
        assert_eq!(badge.label, "MALATTIA");
        assert!(!badge.is_sick_leave);
    }

    #[test]
    fn test_quantity_display() {
        let quantity = quantity_display(&request("Mario")).unwrap();
        assert_eq!(quantity.number, "3");
        assert_eq!(quantity.label, "giorni");

        let mut one_day = request("Mario");
        if let Some(meta) = one_day.moorea_obj.as_mut().and_then(|obj| obj.meta.as_mut()) {
            meta.days = Some(1.2);
        }
        let quantity = quantity_display(&one_day).unwrap();
        assert_eq!(quantity.number, "1");
        assert_eq!(quantity.label, "giorno");

        let mut missing = request("Mario");
        missing.moorea_obj = None;
        assert!(quantity_display(&missing).is_none());
    }

    #[test]
    fn test_date_text() {
        let range = date_text(&request("Mario")).unwrap();
        assert_eq!(range.to_string(), "Da 22/01/25 a 24/01/25");

        let mut single = request("Mario");
        single.data_fine = None;
        assert_eq!(date_text(&single).unwrap().to_string(), "Il 22/01/25");

        let mut from_certificates = request("Mario");
        from_certificates.data_inizio = None;
        from_certificates.data_fine = None;
        from_certificates.moorea_obj = Some(MooreaObj {
            meta: None,
            certificates: vec![CertificateRef {
                data_inizio: Some("2025-02-03".to_string()),
                data_fine: Some("2025-02-03".to_string()),
                ..Default::default()
            }],
        });
        assert_eq!(date_text(&from_certificates).unwrap().to_string(), "Il 03/02/25");
    }

    #[test]
    fn test_date_tooltip() {
        assert_eq!(
            date_tooltip(&request("Mario")).as_deref(),
            Some("Da Mer 22 Gen a Ven 24 Gen")
        );
    }

    #[test]
    fn test_status_icon() {
        assert_eq!(StatusIcon::from(LeaveStatus::Approved).css_class(), Some("status-approved"));
        assert_eq!(StatusIcon::from(LeaveStatus::Rejected).icon_class(), Some("bi bi-x-lg"));
        assert_eq!(StatusIcon::from(LeaveStatus::Pending).css_class(), None);
    }

    #[test]
    fn test_card_view_decodes_certificate() {
        let mut request = request("Mario Rossi");
        request.certificate = Some(CertificateDetails {
            id_certificato: Some("987".to_string()),
            tipo_certificato: Some("C".to_string()),
            tipo_visita: Some("D".to_string()),
            ruolo_medico: Some("P".to_string()),
            medico_nome: Some("Luca Bianchi".to_string()),
            data_rilascio: Some("2025-01-21".to_string()),
            residenza: Some(Address {
                via: Some("Via Roma".to_string()),
                civico: Some("1".to_string()),
                cap: Some("00100".to_string()),
                comune: Some("Roma".to_string()),
                provincia: Some("RM".to_string()),
            }),
            reperibilita: Some(Reachability {
                cognome: Some("Verdi".to_string()),
                indirizzo: Some(Address {
                    via: Some("Via Milano".to_string()),
                    ..Default::default()
                }),
            }),
            trauma: true,
            agevolazioni: Some("T".to_string()),
            ..Default::default()
        });

        let card = SicknessCardView::from_request(&request);
        assert_eq!(card.certificate_type, "Continuazione");
        assert_eq!(card.period_text, "dal 22/01/25 al 24/01/25");
        assert_eq!(card.duration_text, "3 giorni");
        assert_eq!(card.hours_text.as_deref(), Some("24 ore"));
        assert_eq!(card.protocol, "987");
        assert_eq!(card.doctor_role, "Libero Professionista");
        assert_eq!(card.visit_type, "Domiciliare");
        assert_eq!(card.residence, "Via Roma, 1 - 00100 Roma (RM)");
        assert_eq!(card.reachability, "Via Milano -   ()");
        assert_eq!(card.reachability_contact.as_deref(), Some("(Presso: Verdi)"));
        assert_eq!(card.flags, vec!["Trauma".to_string(), "Terapia Salvavita".to_string()]);
        assert_eq!(card.release_date, "21/01/25");
    }

    #[test]
    fn test_card_view_fallbacks() {
        let mut request = request("Anna");
        request.moorea_obj = None;
        let card = SicknessCardView::from_request(&request);
        assert_eq!(card.certificate_type, "Malattia");
        assert_eq!(card.duration_text, "3 giorni");
        assert_eq!(card.protocol, "---");
        assert_eq!(card.doctor, "N/D");
        assert_eq!(card.reachability, "Coincide con residenza");
        assert!(card.reachability_contact.is_none());
        assert!(card.flags.is_empty());
        assert_eq!(card.release_date, "-");
        assert_eq!(card.residence, "Indirizzo non presente");
    }
}
