pub mod bookings;
pub mod menu;
pub mod venue;

use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Текстовая консоль поверх любых async потоков: stdin/stdout в бинарнике,
/// байтовые буферы в тестах.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub async fn say(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }

    /// Печатает вопрос и ждет строку. `None` - ввод закончился.
    pub async fn prompt(&mut self, question: &str) -> io::Result<Option<String>> {
        self.output.write_all(question.as_bytes()).await?;
        self.output.write_all(b"\n> ").await?;
        self.output.flush().await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
