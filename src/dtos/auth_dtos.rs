use serde::Deserialize;

/// Fields of the registration form.
#[derive(Debug, Deserialize)]
pub struct RegisterIn {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginIn {
    pub username: String,
    pub password: String,
}
