//! Patient and doctor rosters as JSON or CSV.

use serde::{Deserialize, Serialize};

use crate::clinic::Clinic;
use crate::models::{Doctor, Patient};

/// One patient line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientRow {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub blood_group: String,
    pub active: bool,
}

impl From<&Patient> for PatientRow {
    fn from(p: &Patient) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            age: p.age,
            gender: p.gender.as_str().to_string(),
            phone: p.phone.clone(),
            address: p.address.clone(),
            blood_group: p.blood_group.clone(),
            active: p.active,
        }
    }
}

/// One doctor line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoctorRow {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub specialization: String,
    pub room_number: i32,
    pub on_duty: bool,
    pub active: bool,
}

impl From<&Doctor> for DoctorRow {
    fn from(d: &Doctor) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            phone: d.phone.clone(),
            email: d.email.clone(),
            specialization: d.specialization.clone(),
            room_number: d.room_number,
            on_duty: d.on_duty,
            active: d.active,
        }
    }
}

/// Roster of patients and doctors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterExport {
    /// Export timestamp
    pub exported_at: String,
    pub patients: Vec<PatientRow>,
    pub doctors: Vec<DoctorRow>,
}

impl RosterExport {
    /// Build a roster; inactive records are left out unless asked for.
    pub fn from_clinic(clinic: &Clinic, include_inactive: bool) -> Self {
        let patients = clinic
            .patients()
            .iter()
            .filter(|p| include_inactive || p.active)
            .map(PatientRow::from)
            .collect();
        let doctors = clinic
            .doctors()
            .iter()
            .filter(|d| include_inactive || d.active)
            .map(DoctorRow::from)
            .collect();

        Self {
            exported_at: chrono::Utc::now().to_rfc3339(),
            patients,
            doctors,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn patients_csv(&self) -> String {
        let mut csv = String::from("id,name,age,gender,phone,address,blood_group,active\n");
        for p in &self.patients {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                p.id,
                escape_csv(&p.name),
                p.age,
                p.gender,
                escape_csv(&p.phone),
                escape_csv(&p.address),
                escape_csv(&p.blood_group),
                p.active,
            ));
        }
        csv
    }

    pub fn doctors_csv(&self) -> String {
        let mut csv = String::from("id,name,phone,email,specialization,room_number,on_duty,active\n");
        for d in &self.doctors {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                d.id,
                escape_csv(&d.name),
                escape_csv(&d.phone),
                escape_csv(&d.email),
                escape_csv(&d.specialization),
                d.room_number,
                d.on_duty,
                d.active,
            ));
        }
        csv
    }

    /// Both tables, patients first, separated by a blank line.
    pub fn to_csv(&self) -> String {
        format!("{}\n{}", self.patients_csv(), self.doctors_csv())
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
