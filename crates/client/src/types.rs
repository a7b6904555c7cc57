//! Response and request shapes used by the client.

use serde::Deserialize;

/// `{ "data": ... }` envelope used by entity endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub fitness_goals: Vec<String>,
}

/// How an uploaded picture ended up stored.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredImage {
    pub url: String,
    /// `cloudinary`, `local`, `inline` or `hosted`.
    pub strategy: String,
}

/// Returned by register and login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: User,
    #[serde(default)]
    pub image: Option<StoredImage>,
}

/// An updated record plus the stored picture, if one was sent.
#[derive(Debug, Clone, Deserialize)]
pub struct Updated<T> {
    pub data: T,
    #[serde(default)]
    pub image: Option<StoredImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trainer {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub specialties: Vec<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub hourly_rate_cents: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub db_healthy: bool,
    #[serde(default)]
    pub image_host_configured: bool,
    #[serde(default)]
    pub image_stores: Vec<String>,
    #[serde(default)]
    pub payments_configured: bool,
}

/// Profile fields to change. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub gender: Option<String>,
    pub fitness_goals: Option<Vec<String>>,
}

impl ProfileChanges {
    /// Multipart text fields for the set values.
    pub(crate) fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(name) = &self.name {
            fields.push(("name", name.clone()));
        }
        if let Some(age) = self.age {
            fields.push(("age", age.to_string()));
        }
        if let Some(h) = self.height_cm {
            fields.push(("height_cm", h.to_string()));
        }
        if let Some(w) = self.weight_kg {
            fields.push(("weight_kg", w.to_string()));
        }
        if let Some(gender) = &self.gender {
            fields.push(("gender", gender.clone()));
        }
        if let Some(goals) = &self.fitness_goals {
            fields.push(("fitness_goals", goals.join(",")));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_set_fields_become_form_parts() {
        let changes = ProfileChanges {
            age: Some(30),
            fitness_goals: Some(vec!["strength".into(), "cardio".into()]),
            ..Default::default()
        };
        assert_eq!(
            changes.form_fields(),
            vec![
                ("age", "30".to_string()),
                ("fitness_goals", "strength,cardio".to_string()),
            ]
        );
    }
}
