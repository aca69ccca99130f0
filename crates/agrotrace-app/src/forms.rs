// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::{Animal, AnimalId, HealthStatus};

/// Add/edit form for one animal. `validate` runs before the roster sees the
/// submission; the roster itself only rejects id conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalFormInput {
    pub rfid: String,
    pub name: String,
    pub breed: String,
    pub age_months: u32,
    pub status: HealthStatus,
    pub location: String,
    pub weight: Option<u32>,
    pub observations: String,
}

impl AnimalFormInput {
    pub fn blank() -> Self {
        Self {
            rfid: String::new(),
            name: String::new(),
            breed: String::new(),
            age_months: 0,
            status: HealthStatus::Healthy,
            location: String::new(),
            weight: None,
            observations: String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rfid.trim().is_empty() {
            bail!("animal RFID tag is required -- scan or enter a tag and retry");
        }
        if self.name.trim().is_empty() {
            bail!("animal name is required -- enter a name and retry");
        }
        if self.breed.trim().is_empty() {
            bail!("animal breed is required -- choose a breed and retry");
        }
        if self.age_months == 0 {
            bail!("animal age is required -- enter the age in months and retry");
        }
        if self.location.trim().is_empty() {
            bail!("animal location is required -- choose a location and retry");
        }
        if let Some(weight) = self.weight
            && weight == 0
        {
            bail!("animal weight must be positive when given");
        }
        Ok(())
    }

    pub fn into_animal(self, id: AnimalId, avatar_color: &str) -> Animal {
        Animal {
            id,
            code: String::new(),
            rfid: self.rfid,
            name: self.name,
            breed: self.breed,
            age_months: self.age_months,
            weight: self.weight,
            status: self.status,
            location: self.location,
            last_scan: None,
            vaccinated: false,
            observations: self.observations,
            avatar_color: avatar_color.to_owned(),
        }
    }

    /// Overwrites the form-owned attributes. Identity, code, avatar color,
    /// scan history and vaccination state are left alone.
    pub fn apply_to(self, animal: &mut Animal) {
        animal.rfid = self.rfid;
        animal.name = self.name;
        animal.breed = self.breed;
        animal.age_months = self.age_months;
        animal.status = self.status;
        animal.location = self.location;
        animal.weight = self.weight;
        animal.observations = self.observations;
    }
}

impl From<&Animal> for AnimalFormInput {
    fn from(animal: &Animal) -> Self {
        Self {
            rfid: animal.rfid.clone(),
            name: animal.name.clone(),
            breed: animal.breed.clone(),
            age_months: animal.age_months,
            status: animal.status,
            location: animal.location.clone(),
            weight: animal.weight,
            observations: animal.observations.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AnimalFormInput;
    use crate::{AnimalId, HealthStatus};

    fn filled() -> AnimalFormInput {
        AnimalFormInput {
            rfid: "RF-0000BEEF".to_owned(),
            name: "Bessie".to_owned(),
            breed: "Holstein".to_owned(),
            age_months: 26,
            status: HealthStatus::Observation,
            location: "Corral 1".to_owned(),
            weight: Some(480),
            observations: String::new(),
        }
    }

    #[test]
    fn blank_form_fails_validation() {
        let error = AnimalFormInput::blank()
            .validate()
            .expect_err("blank form should fail");
        assert!(error.to_string().contains("RFID tag is required"));
    }

    #[test]
    fn each_required_field_is_checked() {
        let mut missing_name = filled();
        missing_name.name = "   ".to_owned();
        assert!(missing_name.validate().is_err());

        let mut missing_age = filled();
        missing_age.age_months = 0;
        assert!(missing_age.validate().is_err());

        let mut missing_location = filled();
        missing_location.location.clear();
        assert!(missing_location.validate().is_err());
    }

    #[test]
    fn zero_weight_is_rejected_but_missing_weight_is_fine() {
        let mut zero = filled();
        zero.weight = Some(0);
        assert!(zero.validate().is_err());

        let mut missing = filled();
        missing.weight = None;
        assert!(missing.validate().is_ok());
    }

    #[test]
    fn edit_round_trip_keeps_identity_fields() {
        let mut animal = filled().into_animal(AnimalId::from("AN-000001"), "#10B981");
        animal.code = "AG0001".to_owned();

        let mut form = AnimalFormInput::from(&animal);
        form.name = "Bessie II".to_owned();
        form.status = HealthStatus::Healthy;
        form.apply_to(&mut animal);

        assert_eq!(animal.id.as_str(), "AN-000001");
        assert_eq!(animal.code, "AG0001");
        assert_eq!(animal.avatar_color, "#10B981");
        assert_eq!(animal.name, "Bessie II");
        assert_eq!(animal.status, HealthStatus::Healthy);
    }
}
