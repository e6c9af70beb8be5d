use crate::di::DnsServices;
use mhos_dns_domain::Notification;
use tracing::{error, info};

const STATUS_MAX_CHARS: usize = 63;
const STATUS_KEEP_CHARS: usize = 60;

/// Runs the responder until Ctrl-C or until it fails on its own, printing
/// every notification as a status line.
pub async fn run_dns_server(services: DnsServices, bind_address: String) -> anyhow::Result<()> {
    let DnsServices {
        server,
        mut notifications,
        ..
    } = services;

    let printer = tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            report(&notification);
        }
    });

    let mut serving = {
        let server = server.clone();
        tokio::spawn(async move { server.start(&bind_address).await })
    };

    let result = tokio::select! {
        finished = &mut serving => finished?,
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            let status = if server.stop() {
                "DNS server stopped"
            } else {
                "DNS server is not running"
            };
            let outcome = serving.await?;
            report(&Notification::info(status));
            outcome
        }
    };

    // The emitter lives inside the server; dropping the last handle closes
    // the channel and lets the printer drain.
    drop(server);
    printer.await?;

    result?;
    Ok(())
}

fn report(notification: &Notification) {
    let line = status_line(notification.message());
    match notification {
        Notification::Info(_) => info!("{}", line),
        Notification::Error(_) => error!("{}", line),
    }
}

/// Status lines longer than 63 characters are cut to 60 plus "...".
fn status_line(message: &str) -> String {
    if message.chars().count() > STATUS_MAX_CHARS {
        let kept: String = message.chars().take(STATUS_KEEP_CHARS).collect();
        format!("{}...", kept)
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_status_is_unchanged() {
        assert_eq!(status_line("[example.com] resolved"), "[example.com] resolved");

        let exact = "x".repeat(63);
        assert_eq!(status_line(&exact), exact);
    }

    #[test]
    fn test_long_status_is_truncated() {
        let message = format!("[{}] resolved", "a".repeat(70));
        let line = status_line(&message);

        assert_eq!(line.chars().count(), 63);
        assert!(line.ends_with("..."));
        assert!(message.starts_with(&line[..60]));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let message = "é".repeat(64);
        let line = status_line(&message);

        assert_eq!(line, format!("{}...", "é".repeat(60)));
    }
}
