use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub frontend_url: String,
    pub session_secret: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(frontend_url: String) -> Self {
        Self {
            frontend_url,
            session_secret: SecretString::default(),
        }
    }

    pub fn set_secret(&mut self, secret: SecretString) {
        self.session_secret = secret;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let url = "http://localhost:3000".to_string();
        let args = GlobalArgs::new(url);
        assert_eq!(args.frontend_url, "http://localhost:3000");
        assert_eq!(args.session_secret.expose_secret(), "");
    }

    #[test]
    fn test_set_secret() {
        let mut args = GlobalArgs::new("http://localhost:3000".to_string());
        args.set_secret(SecretString::from("hunter2"));
        assert_eq!(args.session_secret.expose_secret(), "hunter2");
    }
}
