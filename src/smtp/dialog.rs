//! Raw SMTP dialog (spec §4.9 step 4), one TCP connection per attempt.
//!
//! The teacher's own `verify_mail` wraps `async_smtp`'s typed command set,
//! but that crate's `Response` exposes RFC3463 enhanced status codes
//! (severity/category/detail), not the literal three-digit reply codes
//! spec §4.9 classifies on (250/251, 550-554, 450-452, 252). Rather than
//! force-fit that shape, the dialog here is hand-rolled over a buffered
//! `TcpStream`, reading and classifying the literal reply code directly —
//! still in the teacher's connect-then-command rhythm, just one layer
//! lower. See DESIGN.md for the full rationale.

use rand::Rng;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Reply codes captured from the two RCPT TO attempts in one dialog.
pub struct DialogOutcome {
    pub random_code: u16,
    pub real_code: u16,
}

pub async fn run(host: &str, port: u16, helo_domain: &str, probe_sender: &str, real_email: &str) -> anyhow::Result<DialogOutcome> {
    let stream = TcpStream::connect((host, port)).await?;
    let (rd, mut wr) = stream.into_split();
    let mut reader = BufReader::new(rd);

    read_response(&mut reader).await?; // 220 greeting

    let mut code = send_command(&mut wr, &mut reader, &format!("EHLO {helo_domain}\r\n")).await?;
    if code / 100 != 2 {
        code = send_command(&mut wr, &mut reader, &format!("HELO {helo_domain}\r\n")).await?;
    }
    if code / 100 != 2 {
        anyhow::bail!("EHLO/HELO rejected with {code}");
    }

    send_command(&mut wr, &mut reader, &format!("MAIL FROM:<{probe_sender}>\r\n")).await?;

    let domain = real_email.rsplit_once('@').map(|(_, d)| d).unwrap_or("");
    let random_address = format!("{}@{domain}", random_localpart());
    let random_code = send_command(&mut wr, &mut reader, &format!("RCPT TO:<{random_address}>\r\n")).await?;

    let _ = send_command(&mut wr, &mut reader, "RSET\r\n").await;
    let _ = send_command(&mut wr, &mut reader, &format!("MAIL FROM:<{probe_sender}>\r\n")).await;
    let real_code = send_command(&mut wr, &mut reader, &format!("RCPT TO:<{real_email}>\r\n")).await?;

    let _ = send_command(&mut wr, &mut reader, "QUIT\r\n").await;

    Ok(DialogOutcome { random_code, real_code })
}

/// Reads one (possibly multi-line, `NNN-...` continued) SMTP response and
/// returns its three-digit reply code.
async fn read_response(reader: &mut (impl AsyncBufReadExt + Unpin)) -> anyhow::Result<u16> {
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            anyhow::bail!("connection closed before a response was received");
        }
        if line.len() < 4 || !line.as_bytes()[0..3].iter().all(u8::is_ascii_digit) {
            anyhow::bail!("malformed SMTP response line: {line:?}");
        }
        let code: u16 = line[0..3].parse()?;
        if line.as_bytes()[3] == b' ' {
            return Ok(code);
        }
        // `-` separator: more lines follow for this same response.
    }
}

async fn send_command(
    writer: &mut (impl AsyncWriteExt + Unpin),
    reader: &mut (impl AsyncBufReadExt + Unpin),
    command: &str,
) -> anyhow::Result<u16> {
    writer.write_all(command.as_bytes()).await?;
    writer.flush().await?;
    read_response(reader).await
}

fn random_localpart() -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..12)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("probe-{suffix}")
}
