use anyhow::{Context, Result};
use async_imap::Session;
use async_native_tls::TlsStream;
use async_std::net::TcpStream;
use async_trait::async_trait;
use futures::TryStreamExt;

/// A parsed inbound message. Transient: consumed once by a reconciliation
/// pass and never persisted.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub seq: u32,
    pub sender: Option<String>,
    pub subject: String,
}

/// One mailbox session, scoped to a single reconciliation call.
///
/// Only messages that are both unseen and To:-addressed to the alias are ever
/// returned or flagged; everything else in the mailbox stays untouched.
#[async_trait]
pub trait MailboxSession: Send {
    /// Sequence numbers of unseen messages addressed to `alias`.
    async fn search_unseen_to(&mut self, alias: &str) -> Result<Vec<u32>>;

    /// Fetch and parse the full bodies for `seqs`. A message that fails to
    /// parse is logged and omitted from the result.
    async fn fetch(&mut self, seqs: &[u32]) -> Result<Vec<InboundMessage>>;

    /// Flag all of `seqs` as seen in one batch store.
    async fn mark_seen(&mut self, seqs: &[u32]) -> Result<()>;

    async fn logout(&mut self) -> Result<()>;
}

pub struct ImapMailbox {
    session: Session<TlsStream<TcpStream>>,
}

impl ImapMailbox {
    /// Connect over TLS, log in with the app password, and select `folder`.
    pub async fn connect(host: &str, email: &str, password: &str, folder: &str) -> Result<Self> {
        let tcp = TcpStream::connect((host, 993))
            .await
            .context("Failed to connect to IMAP server")?;

        let tls = async_native_tls::TlsConnector::new();
        let tls_stream = tls
            .connect(host, tcp)
            .await
            .context("TLS handshake failed")?;

        let client = async_imap::Client::new(tls_stream);

        let mut session = client
            .login(email, password)
            .await
            .map_err(|e| anyhow::anyhow!("Login failed: {}", e.0))?;

        session
            .select(folder)
            .await
            .with_context(|| format!("Failed to select {}", folder))?;

        Ok(Self { session })
    }
}

#[async_trait]
impl MailboxSession for ImapMailbox {
    async fn search_unseen_to(&mut self, alias: &str) -> Result<Vec<u32>> {
        let query = format!("UNSEEN TO \"{}\"", alias);
        let seqs = self
            .session
            .search(&query)
            .await
            .context("Search failed")?;

        let mut seqs: Vec<u32> = seqs.into_iter().collect();
        seqs.sort_unstable();
        Ok(seqs)
    }

    async fn fetch(&mut self, seqs: &[u32]) -> Result<Vec<InboundMessage>> {
        if seqs.is_empty() {
            return Ok(vec![]);
        }

        let set = seq_set(seqs);
        let messages: Vec<_> = self
            .session
            .fetch(&set, "(RFC822)")
            .await
            .context("Failed to fetch messages")?
            .try_collect()
            .await?;

        let mut parsed = Vec::new();
        for message in &messages {
            let seq = message.message;

            let Some(body) = message.body() else {
                tracing::warn!("Message {} had no body", seq);
                continue;
            };

            match mailparse::parse_mail(body) {
                Ok(mail) => parsed.push(parse_message(seq, &mail)),
                Err(e) => {
                    tracing::warn!("Failed to parse message {}: {}", seq, e);
                }
            }
        }

        Ok(parsed)
    }

    async fn mark_seen(&mut self, seqs: &[u32]) -> Result<()> {
        if seqs.is_empty() {
            return Ok(());
        }

        let set = seq_set(seqs);
        self.session
            .store(&set, "+FLAGS (\\Seen)")
            .await
            .context("Failed to flag messages as seen")?
            .try_collect::<Vec<_>>()
            .await?;

        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        self.session.logout().await.context("Failed to logout")?;
        Ok(())
    }
}

fn seq_set(seqs: &[u32]) -> String {
    seqs.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_message(seq: u32, mail: &mailparse::ParsedMail) -> InboundMessage {
    let subject = mail
        .headers
        .iter()
        .find(|h| h.get_key().eq_ignore_ascii_case("subject"))
        .map(|h| h.get_value())
        .unwrap_or_default();

    let from = mail
        .headers
        .iter()
        .find(|h| h.get_key().eq_ignore_ascii_case("from"))
        .map(|h| h.get_value())
        .unwrap_or_default();

    InboundMessage {
        seq,
        sender: sender_address(&from),
        subject,
    }
}

/// Extract the bare address from a From header value.
fn sender_address(raw: &str) -> Option<String> {
    mailparse::addrparse(raw)
        .ok()
        .and_then(|list| list.extract_single_info())
        .map(|info| info.addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_address_handles_display_names() {
        assert_eq!(
            sender_address("Hanako Yamada <hanako@example.com>").as_deref(),
            Some("hanako@example.com")
        );
        assert_eq!(
            sender_address("taro@example.com").as_deref(),
            Some("taro@example.com")
        );
        assert_eq!(sender_address(""), None);
    }

    #[test]
    fn parses_sender_and_subject_from_rfc822() {
        let raw = b"From: Taro <taro@example.com>\r\n\
Subject: =?UTF-8?B?6YWN5L+h5YGc5q2i?=\r\n\
To: pets+travel-pet@example.com\r\n\
\r\n\
bye\r\n";
        let mail = mailparse::parse_mail(raw).unwrap();
        let message = parse_message(7, &mail);
        assert_eq!(message.seq, 7);
        assert_eq!(message.sender.as_deref(), Some("taro@example.com"));
        assert_eq!(message.subject, "配信停止");
    }

    #[test]
    fn seq_set_joins_with_commas() {
        assert_eq!(seq_set(&[3, 5, 9]), "3,5,9");
    }
}
