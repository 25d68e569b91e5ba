use std::io::Read;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use super::{ScanError, Scanner, Token};

/// Events the scanner may run ahead of its consumer before it blocks.
const STREAM_CAPACITY: usize = 64;

/// One step of a scan: a recognised token or a problem at some point in the source.
pub type ScanEvent = Result<Token, ScanError>;

/// Tokens and errors delivered from a scanner running on its own thread.
///
/// Events arrive in source order. The stream ends (returns `None`) once the
/// scanner has sent its `Eof` token, or straight after a fatal
/// [`ScanError::Read`]. Dropping the stream early makes the producer stop at
/// its next send.
pub struct TokenStream {
    events: Receiver<ScanEvent>,
    producer: Option<JoinHandle<()>>,
}

impl TokenStream {
    /// Scan a source string that is already in memory.
    pub fn spawn(source: String) -> Self {
        Self::start(move |sender| produce(&source, &sender))
    }

    /// Read the whole source from `reader` on the producer thread, then scan it.
    pub fn from_reader<R: Read + Send + 'static>(mut reader: R) -> Self {
        Self::start(move |sender| {
            let mut source = String::new();
            if let Err(e) = reader.read_to_string(&mut source) {
                // nothing to recover from without a character stream
                let _ = sender.send(Err(ScanError::Read(e)));
                return;
            }
            produce(&source, &sender);
        })
    }

    fn start<F>(scan: F) -> Self
    where
        F: FnOnce(SyncSender<ScanEvent>) + Send + 'static,
    {
        let (sender, events) = sync_channel(STREAM_CAPACITY);
        let producer = thread::spawn(move || scan(sender));
        TokenStream {
            events,
            producer: Some(producer),
        }
    }
}

fn produce(source: &str, sender: &SyncSender<ScanEvent>) {
    for event in Scanner::new(source) {
        // receiver hung up
        if sender.send(event).is_err() {
            return;
        }
    }
}

impl Iterator for TokenStream {
    type Item = ScanEvent;

    fn next(&mut self) -> Option<ScanEvent> {
        match self.events.recv() {
            Ok(event) => Some(event),
            // every sender is gone, so the producer is done
            Err(_) => {
                if let Some(producer) = self.producer.take() {
                    if let Err(panic) = producer.join() {
                        std::panic::resume_unwind(panic);
                    }
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::{self, Cursor, Read};
    use std::thread;

    use super::TokenStream;
    use crate::lox::scanner::{ScanError, Scanner, TokenType};

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device went away"))
        }
    }

    fn render(events: impl Iterator<Item = super::ScanEvent>) -> Vec<String> {
        events
            .map(|event| match event {
                Ok(token) => format!("{} @{}", token, token.line),
                Err(e) => e.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_stream_matches_scanner() {
        let source = "var a = \"x\";\n@ print a >= 2.5; // done\n\"open";
        let streamed = render(TokenStream::spawn(source.to_owned()));
        let scanned = render(Scanner::new(source));
        assert_eq!(streamed, scanned);
        assert!(streamed.len() > 8);
    }

    #[test]
    fn test_stream_ends_with_eof() {
        let events: Vec<_> = TokenStream::spawn("1 + 2".to_owned()).collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events.last(), Some(Ok(t)) if t.token_type == TokenType::Eof));
    }

    #[test]
    fn test_stream_larger_than_channel() {
        let source = "x ".repeat(1000);
        let count = TokenStream::spawn(source).count();
        assert_eq!(count, 1001);
    }

    #[test]
    fn test_from_reader() {
        let events: Vec<_> = TokenStream::from_reader(Cursor::new("print 1;")).collect();
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|e| e.is_ok()));
    }

    #[test]
    fn test_read_failure_is_fatal() {
        let events: Vec<_> = TokenStream::from_reader(BrokenReader).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            Err(e @ ScanError::Read(_)) => {
                assert!(e.is_fatal());
                assert_eq!(e.line(), None);
            }
            other => panic!("expected a read failure, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let events: Vec<_> = TokenStream::from_reader(Cursor::new(vec![b'a', 0xff, 0xfe])).collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Err(ScanError::Read(_))));
    }

    #[test]
    fn test_early_drop() {
        let mut stream = TokenStream::spawn("a ".repeat(500));
        assert!(matches!(stream.next(), Some(Ok(_))));
        drop(stream);
    }

    #[test]
    fn test_independent_concurrent_scans() {
        let sources: Vec<String> = (0..4)
            .map(|i| format!("{}\n", "a ".repeat(i + 1)).repeat(50))
            .collect();
        let handles: Vec<_> = sources
            .iter()
            .cloned()
            .map(|source| thread::spawn(move || render(TokenStream::spawn(source))))
            .collect();
        for (source, handle) in sources.iter().zip(handles) {
            let streamed = handle.join().expect("consumer thread panicked");
            assert_eq!(streamed, render(Scanner::new(source)));
        }
    }
}
