//! Test support utilities - only compiled in test builds.

use crate::transport::Transport;

/// Depth of the scripted read queue
const QUEUE: usize = 8;

/// One scripted answer to `read_register_region`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Full 4-byte register value
    Word(u32),
    /// Only the first `n` bytes of the value arrive
    Short(u32, usize),
    /// Transfer fails
    Fail,
}

/// Scripted in-memory oscillator.
///
/// Reads are served from the queue first; once it is empty they return
/// whatever was last written to the DAC (or `dac` as initialised).
#[derive(Debug)]
pub struct FakeBus {
    pub present: bool,
    pub dac: u32,
    pub fail_writes: bool,
    pub fail_commands: bool,
    /// Value the DAC settles to after a save command, if any
    pub save_adjust: Option<u32>,
    pub probes: usize,
    pub reads: usize,
    pub writes: usize,
    pub commands: usize,
    pub last_read_reg: Option<u8>,
    pub last_write: Option<(u8, [u8; 4])>,
    pub last_command: Option<u8>,
    queue: [Option<Reply>; QUEUE],
    head: usize,
    tail: usize,
}

impl FakeBus {
    pub fn new(dac: u32) -> Self {
        FakeBus {
            present: true,
            dac,
            fail_writes: false,
            fail_commands: false,
            save_adjust: None,
            probes: 0,
            reads: 0,
            writes: 0,
            commands: 0,
            last_read_reg: None,
            last_write: None,
            last_command: None,
            queue: [None; QUEUE],
            head: 0,
            tail: 0,
        }
    }

    pub fn absent() -> Self {
        FakeBus { present: false, ..FakeBus::new(0) }
    }

    /// Queues the next read answer
    pub fn push(&mut self, r: Reply) -> &mut Self {
        self.queue[self.tail % QUEUE] = Some(r);
        self.tail += 1;
        self
    }

    /// Last word written to the DAC register
    pub fn written_word(&self) -> Option<u32> {
        self.last_write.map(|(_, b)| u32::from_be_bytes(b))
    }

    fn pop(&mut self) -> Option<Reply> {
        if self.head == self.tail {
            return None;
        }
        let r = self.queue[self.head % QUEUE].take();
        self.head += 1;
        r
    }
}

impl Transport for FakeBus {
    type Error = ();

    fn probe(&mut self) -> Result<(), ()> {
        self.probes += 1;
        if self.present { Ok(()) } else { Err(()) }
    }

    fn read_register_region(&mut self, reg: u8, buf: &mut [u8]) -> Result<usize, ()> {
        self.reads += 1;
        self.last_read_reg = Some(reg);
        let reply = self.pop().unwrap_or(Reply::Word(self.dac));
        let (w, n) = match reply {
            Reply::Word(w) => (w, 4),
            Reply::Short(w, n) => (w, n),
            Reply::Fail => return Err(()),
        };
        let bytes = w.to_be_bytes();
        let n = n.min(buf.len());
        buf[..n].copy_from_slice(&bytes[..n]);
        Ok(n)
    }

    fn write_register_region(&mut self, reg: u8, data: &[u8]) -> Result<(), ()> {
        self.writes += 1;
        if self.fail_writes {
            return Err(());
        }
        let mut b = [0u8; 4];
        b.copy_from_slice(data);
        self.last_write = Some((reg, b));
        self.dac = u32::from_be_bytes(b);
        Ok(())
    }

    fn write_command_byte(&mut self, reg: u8) -> Result<(), ()> {
        self.commands += 1;
        if self.fail_commands {
            return Err(());
        }
        self.last_command = Some(reg);
        if let Some(w) = self.save_adjust {
            self.dac = w;
        }
        Ok(())
    }
}
