//! Sample records for the CLI `--sample` path and for tests.

use crate::record::{MedicationLine, PrescriptionRecord, Record, VisitRecord};

/// The clinic's demo visits.
pub fn visit_records() -> Vec<VisitRecord> {
    vec![
        VisitRecord {
            id: 1,
            patient_name: "John Doe".to_string(),
            visit_date: "2025-10-15".to_string(),
            visit_type: "Follow-up".to_string(),
            who_stage: "Stage 1".to_string(),
            notes: "Patient doing well on current regimen. No complaints. \
                    Continue current treatment plan."
                .to_string(),
        },
        VisitRecord {
            id: 2,
            patient_name: "Maria Santos".to_string(),
            visit_date: "2025-10-10".to_string(),
            visit_type: "Follow-up".to_string(),
            who_stage: "Stage 1".to_string(),
            notes: "Discussed importance of adherence. Patient reports occasional \
                    missed doses. Reinforced counseling on medication adherence."
                .to_string(),
        },
    ]
}

/// The clinic's demo prescriptions.
pub fn prescription_records() -> Vec<PrescriptionRecord> {
    vec![
        PrescriptionRecord {
            id: 1,
            patient_name: "John Doe".to_string(),
            patient_age: 30,
            patient_gender: "Male".to_string(),
            physician_name: "Dr. Maria Santos".to_string(),
            prescription_date: "10/15/2025".to_string(),
            medications: vec![MedicationLine {
                drug_name: "Tenofovir/Lamivudine/Dolutegravir (TLD)".to_string(),
                dosage: "1 tablet".to_string(),
                frequency: "Once daily".to_string(),
                duration: "30 days".to_string(),
            }],
            notes: "Continue current regimen and monitor side effects".to_string(),
            next_refill: "11/15/2025".to_string(),
        },
        PrescriptionRecord {
            id: 2,
            patient_name: "Maria Santos".to_string(),
            patient_age: 35,
            patient_gender: "Female".to_string(),
            physician_name: "Dr. Maria Santos".to_string(),
            prescription_date: "10/10/2025".to_string(),
            medications: vec![
                MedicationLine {
                    drug_name: "Efavirenz 600mg".to_string(),
                    dosage: "1 tablet".to_string(),
                    frequency: "Once daily".to_string(),
                    duration: "30 days".to_string(),
                },
                MedicationLine {
                    drug_name: "Cotrimoxazole 960mg".to_string(),
                    dosage: "1 tablet".to_string(),
                    frequency: "Once daily".to_string(),
                    duration: "30 days".to_string(),
                },
            ],
            notes: "Prophylaxis for opportunistic infections".to_string(),
            next_refill: "11/10/2025".to_string(),
        },
    ]
}

/// First demo visit, wrapped as a [`Record`].
pub fn sample_visit() -> Record {
    Record::Visit(visit_records().remove(0))
}

/// First demo prescription, wrapped as a [`Record`].
pub fn sample_prescription() -> Record {
    Record::Prescription(prescription_records().remove(0))
}
