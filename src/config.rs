use std::net::SocketAddr;

use anyhow::Context;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

impl ServerConfig {
  pub fn from_env() -> anyhow::Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
    let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = match lookup("PORT") {
      Some(raw) => raw
        .parse()
        .with_context(|| format!("PORT must be a valid port number, got {:?}", raw))?,
      None => DEFAULT_PORT,
    };

    Ok(Self { host, port })
  }

  pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
    format!("{}:{}", self.host, self.port)
      .parse()
      .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
  }
}
