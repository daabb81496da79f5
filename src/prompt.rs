//! Console input validation

use crate::error::{Error, Result};
use crate::qr::is_valid_payload;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Text shown before every read
pub const PROMPT: &str = "Add data to QR Code: ";

/// Text shown after a blank entry
pub const EMPTY_INPUT_MESSAGE: &str = "Input cannot be empty. Please try again.";

/// Keep prompting until a line with non-whitespace content is entered.
///
/// The returned text is the line without its terminator. End of input is
/// reported as [`Error::InputClosed`] rather than retried.
pub async fn prompt_until_valid<R, W>(reader: &mut R, writer: &mut W) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    let mut attempts: u32 = 0;

    loop {
        writer.write_all(PROMPT.as_bytes()).await?;
        writer.flush().await?;

        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Err(Error::InputClosed);
        }
        attempts += 1;

        let entered = line.trim_end_matches(['\n', '\r']);
        if is_valid_payload(entered) {
            tracing::debug!(attempts, chars = entered.chars().count(), "Accepted QR input");
            return Ok(entered.to_string());
        }

        writer.write_all(EMPTY_INPUT_MESSAGE.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
}

/// [`prompt_until_valid`] over the process stdin/stdout
pub async fn prompt_stdin() -> Result<String> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut writer = tokio::io::stdout();
    prompt_until_valid(&mut reader, &mut writer).await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(input: &str) -> (Result<String>, String) {
        let mut reader = input.as_bytes();
        let mut output = Vec::new();
        let result = prompt_until_valid(&mut reader, &mut output).await;
        (result, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn test_accepts_first_valid_line() {
        let (result, output) = run("hello world\n").await;
        assert_eq!(result.unwrap(), "hello world");
        assert_eq!(output, PROMPT);
    }

    #[tokio::test]
    async fn test_reprompts_on_blank_lines() {
        let (result, output) = run("\n   \r\na\n").await;
        assert_eq!(result.unwrap(), "a");
        assert_eq!(output.matches(PROMPT).count(), 3);
        assert_eq!(output.matches(EMPTY_INPUT_MESSAGE).count(), 2);
    }

    #[tokio::test]
    async fn test_keeps_surrounding_spaces_of_valid_input() {
        let (result, _) = run("  padded  \r\n").await;
        assert_eq!(result.unwrap(), "  padded  ");
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let (result, _) = run("   \ntrailing").await;
        assert_eq!(result.unwrap(), "trailing");
    }

    #[tokio::test]
    async fn test_end_of_input_stops_loop() {
        let (result, output) = run("  \n").await;
        assert!(matches!(result, Err(Error::InputClosed)));
        assert_eq!(output.matches(EMPTY_INPUT_MESSAGE).count(), 1);
    }
}
