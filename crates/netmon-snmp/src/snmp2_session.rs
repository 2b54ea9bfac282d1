use async_trait::async_trait;
use netmon_types::{TransportCredentials, TypedValue};
use snmp2::{AsyncSession, Value};
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::config::SessionConfig;
use crate::error::SnmpError;
use crate::oid::{oid_starts_with, oid_to_string, parse_oid};
use crate::security::build_v3_security;
use crate::session::SnmpSession;
use crate::value::from_snmp2;

fn resolve_address(address: &str) -> String {
    if address.contains(':') {
        address.to_string()
    } else {
        format!("{address}:161")
    }
}

/// Concrete [`SnmpSession`] backed by the `snmp2` async client. One instance
/// per device: v2c/v1 sessions are cheap and opened per request, while a v3
/// session is opened once and kept alive behind a mutex so its engine ID /
/// time sync survives across requests.
pub struct Snmp2Session {
    address: String,
    credentials: TransportCredentials,
    config: SessionConfig,
    v3_session: Option<Mutex<AsyncSession>>,
}

impl Snmp2Session {
    /// Open a session for `address` using `credentials`. For SNMPv3 this
    /// performs engine ID discovery immediately; for v2c/v1 it only records
    /// the community string; real sockets are opened lazily per request.
    pub async fn connect(
        address: &str,
        credentials: TransportCredentials,
        config: SessionConfig,
    ) -> Result<Self, SnmpError> {
        let address = resolve_address(address);

        let v3_session = match &credentials {
            TransportCredentials::V3 { user, auth, privacy } => {
                let security = build_v3_security(user, auth.as_ref(), privacy.as_ref())?;
                let mut session = AsyncSession::new_v3(&address, 0, security)
                    .await
                    .map_err(|e| SnmpError::Transport(e.to_string()))?;
                session
                    .init()
                    .await
                    .map_err(|e| SnmpError::Transport(format!("v3 engine discovery: {e}")))?;
                Some(Mutex::new(session))
            }
            TransportCredentials::V2c { .. } => None,
        };

        Ok(Self {
            address,
            credentials,
            config,
            v3_session,
        })
    }

    async fn open_v2c(&self) -> Result<AsyncSession, SnmpError> {
        let TransportCredentials::V2c { community } = &self.credentials else {
            unreachable!("open_v2c only called for V2c credentials")
        };
        AsyncSession::new_v2c(&self.address, community.as_bytes(), 0)
            .await
            .map_err(|e| SnmpError::Transport(e.to_string()))
    }

    async fn single_get(&self, parsed: &snmp2::ObjectIdentifier) -> Result<TypedValue, SnmpError> {
        let mut response = match &self.v3_session {
            Some(session) => {
                let mut session = session.lock().await;
                session
                    .get(parsed)
                    .await
                    .map_err(|e| classify_snmp2_error(&e))?
            }
            None => {
                let mut session = self.open_v2c().await?;
                session
                    .get(parsed)
                    .await
                    .map_err(|e| classify_snmp2_error(&e))?
            }
        };

        let Some((_, value)) = response.varbinds.next() else {
            return Err(SnmpError::Decode("empty response".into()));
        };
        match value {
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView => {
                Err(SnmpError::NoSuchName(oid_to_string(parsed)))
            }
            other => from_snmp2(&other)
                .ok_or_else(|| SnmpError::Decode(format!("unsupported value for {parsed}"))),
        }
    }

    async fn single_get_next(
        &self,
        parsed: &snmp2::ObjectIdentifier,
    ) -> Result<(String, TypedValue), SnmpError> {
        let mut response = match &self.v3_session {
            Some(session) => {
                let mut session = session.lock().await;
                session
                    .getnext(parsed)
                    .await
                    .map_err(|e| classify_snmp2_error(&e))?
            }
            None => {
                let mut session = self.open_v2c().await?;
                session
                    .getnext(parsed)
                    .await
                    .map_err(|e| classify_snmp2_error(&e))?
            }
        };

        let Some((resp_oid, value)) = response.varbinds.next() else {
            return Err(SnmpError::Decode("empty response".into()));
        };
        match value {
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView => {
                Err(SnmpError::NoSuchName(oid_to_string(parsed)))
            }
            other => {
                let typed = from_snmp2(&other)
                    .ok_or_else(|| SnmpError::Decode(format!("unsupported value for {resp_oid}")))?;
                Ok((oid_to_string(&resp_oid), typed))
            }
        }
    }

    /// Run `op` with the session's configured timeout, retrying transient
    /// failures up to `config.retries` times, re-issuing the PDU with a
    /// fresh request ID each attempt.
    async fn with_retry<T, F, Fut>(&self, mut op: F) -> Result<T, SnmpError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, SnmpError>>,
    {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let outcome = match timeout(self.config.timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(SnmpError::Timeout { attempts }),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempts <= self.config.retries => {
                    tracing::debug!(
                        address = %self.address,
                        attempt = attempts,
                        error = %e,
                        "snmp request retrying"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// `snmp2::Error` doesn't distinguish auth/decode/transport itself, so we
/// classify by the textual variant name. Anything not
/// recognized as an auth or decode failure is treated as `Transport`, which
/// is the safe default: it counts toward the orchestrator's unreachability
/// threshold rather than being silently ignored.
fn classify_snmp2_error(err: &snmp2::Error) -> SnmpError {
    let text = format!("{err:?}");
    if text.contains("Auth") || text.contains("SecurityLevel") || text.contains("TimeWindow") {
        SnmpError::AuthFailure(err.to_string())
    } else if text.contains("Asn") || text.contains("Parse") || text.contains("ValueOutOfRange") {
        SnmpError::Decode(err.to_string())
    } else {
        SnmpError::Transport(err.to_string())
    }
}

#[async_trait]
impl SnmpSession for Snmp2Session {
    async fn get(&self, oid: &str) -> Result<TypedValue, SnmpError> {
        let parsed = parse_oid(oid)?;
        self.with_retry(|| async { self.single_get(&parsed).await })
            .await
    }

    async fn get_next(&self, oid: &str) -> Result<(String, TypedValue), SnmpError> {
        let parsed = parse_oid(oid)?;
        self.with_retry(|| async { self.single_get_next(&parsed).await })
            .await
    }

    async fn walk(&self, subtree_oid: &str) -> Result<Vec<(String, TypedValue)>, SnmpError> {
        let subtree = parse_oid(subtree_oid)?;
        let mut current = subtree.clone();
        let mut results = Vec::new();

        loop {
            let parsed = current.clone();
            let step = self
                .with_retry(|| async { self.single_get_next(&parsed).await })
                .await;

            let (resp_oid_str, value) = match step {
                Ok(pair) => pair,
                Err(SnmpError::NoSuchName(_)) => break,
                Err(e) => return Err(e),
            };

            let resp_oid = parse_oid(&resp_oid_str)?;
            if !oid_starts_with(&resp_oid, &subtree) {
                break;
            }

            results.push((resp_oid_str, value));
            current = resp_oid;
        }

        Ok(results)
    }

    async fn bulk_walk(
        &self,
        subtree_oid: &str,
        max_repetitions: u32,
    ) -> Result<Vec<(String, TypedValue)>, SnmpError> {
        let subtree = parse_oid(subtree_oid)?;
        let mut current = subtree.clone();
        let mut results = Vec::new();

        'outer: loop {
            let parsed = current.clone();
            let batch = self
                .with_retry(|| async {
                    let mut response = match &self.v3_session {
                        Some(session) => {
                            let mut session = session.lock().await;
                            session
                                .getbulk(&[parsed.clone()], 0, max_repetitions)
                                .await
                                .map_err(|e| classify_snmp2_error(&e))?
                        }
                        None => {
                            let mut session = self.open_v2c().await?;
                            session
                                .getbulk(&[parsed.clone()], 0, max_repetitions)
                                .await
                                .map_err(|e| classify_snmp2_error(&e))?
                        }
                    };
                    let pairs: Vec<(snmp2::ObjectIdentifier, Value)> =
                        response.varbinds.by_ref().collect();
                    Ok(pairs)
                })
                .await?;

            if batch.is_empty() {
                break;
            }

            let mut advanced = false;
            for (resp_oid, value) in batch {
                if !oid_starts_with(&resp_oid, &subtree) {
                    break 'outer;
                }
                if matches!(value, Value::EndOfMibView) {
                    break 'outer;
                }
                if let Some(typed) = from_snmp2(&value) {
                    results.push((oid_to_string(&resp_oid), typed));
                }
                current = resp_oid;
                advanced = true;
            }
            if !advanced {
                break;
            }
        }

        Ok(results)
    }
}
