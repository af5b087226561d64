//! Simulated MSSP peripheral wired to a single register-file slave.

use super::mssp::Mssp;
use core::cell::RefCell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Start,
    Restart,
    Stop,
    Tx(u8),
    RxEnable,
    Rx(u8),
    Ack,
    Nack,
}

/// Misbehaviour injected into the simulated slave
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    None,
    /// NACK the address byte of a write-direction frame
    NackAddress,
    /// NACK the address byte sent after the repeated start
    NackReadAddress,
    NackRegister,
    NackData,
    /// Never complete a receive
    RxStall,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Address,
    Pointer,
    Data,
    Reading,
}

struct State {
    address: u8,
    registers: [u8; 0x13],
    fault: Fault,
    events: Vec<Event>,
    phase: Phase,
    pointer: usize,
    ackstat: bool,
    ackdt: bool,
    rx: Option<u8>,
    bf_polls: u32,
    divisor: Option<u8>,
    master: bool,
    errors_cleared: bool,
    enabled: bool,
}

pub struct MockMssp {
    state: RefCell<State>,
}

impl MockMssp {
    pub fn new(address: u8) -> Self {
        MockMssp {
            state: RefCell::new(State {
                address,
                registers: [0; 0x13],
                fault: Fault::None,
                events: Vec::new(),
                phase: Phase::Idle,
                pointer: 0,
                ackstat: false,
                ackdt: false,
                rx: None,
                bf_polls: 0,
                divisor: None,
                master: false,
                errors_cleared: false,
                enabled: false,
            }),
        }
    }

    pub fn with_register(self, register: u8, value: u8) -> Self {
        self.state.borrow_mut().registers[register as usize] = value;
        self
    }

    pub fn with_fault(self, fault: Fault) -> Self {
        self.state.borrow_mut().fault = fault;
        self
    }

    pub fn register(&self, register: u8) -> u8 {
        self.state.borrow().registers[register as usize]
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn bf_polls(&self) -> u32 {
        self.state.borrow().bf_polls
    }

    pub fn divisor(&self) -> Option<u8> {
        self.state.borrow().divisor
    }

    pub fn is_ready(&self) -> bool {
        let s = self.state.borrow();
        s.master && s.errors_cleared && s.enabled
    }
}

impl State {
    fn advance_pointer(&mut self) {
        self.pointer = (self.pointer + 1) % self.registers.len();
    }
}

impl Mssp for MockMssp {
    fn sspadd_wr(&self, divisor: u8) {
        self.state.borrow_mut().divisor = Some(divisor);
    }

    fn master_mode(&self) {
        self.state.borrow_mut().master = true;
    }

    fn clear_errors(&self) {
        self.state.borrow_mut().errors_cleared = true;
    }

    fn sspen_set(&self) {
        self.state.borrow_mut().enabled = true;
    }

    fn sen_set(&self) {
        let mut s = self.state.borrow_mut();
        s.events.push(Event::Start);
        s.phase = Phase::Address;
    }

    fn sen_rd(&self) -> bool {
        false
    }

    fn rsen_set(&self) {
        let mut s = self.state.borrow_mut();
        s.events.push(Event::Restart);
        s.phase = Phase::Address;
    }

    fn rsen_rd(&self) -> bool {
        false
    }

    fn pen_set(&self) {
        let mut s = self.state.borrow_mut();
        s.events.push(Event::Stop);
        s.phase = Phase::Idle;
    }

    fn pen_rd(&self) -> bool {
        false
    }

    fn sspbuf_wr(&self, byte: u8) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        s.events.push(Event::Tx(byte));
        let nack = match s.phase {
            Phase::Address => {
                let read = byte & 0x01 != 0;
                let nack = byte >> 1 != s.address
                    || (!read && s.fault == Fault::NackAddress)
                    || (read && s.fault == Fault::NackReadAddress);
                if !nack {
                    s.phase = if read { Phase::Reading } else { Phase::Pointer };
                }
                nack
            }
            Phase::Pointer => {
                let nack = s.fault == Fault::NackRegister;
                if !nack {
                    s.pointer = byte as usize % s.registers.len();
                    s.phase = Phase::Data;
                }
                nack
            }
            Phase::Data => {
                let nack = s.fault == Fault::NackData;
                if !nack {
                    s.registers[s.pointer] = byte;
                    s.advance_pointer();
                }
                nack
            }
            Phase::Idle | Phase::Reading => true,
        };
        s.ackstat = nack;
    }

    fn sspbuf_rd(&self) -> u8 {
        let mut s = self.state.borrow_mut();
        let byte = s.rx.take().unwrap_or(0);
        s.events.push(Event::Rx(byte));
        byte
    }

    fn rw_rd(&self) -> bool {
        false
    }

    fn ackstat_rd(&self) -> bool {
        self.state.borrow().ackstat
    }

    fn rcen_set(&self) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        s.events.push(Event::RxEnable);
        if s.phase == Phase::Reading && s.fault != Fault::RxStall {
            let byte = s.registers[s.pointer];
            s.rx = Some(byte);
            s.advance_pointer();
        }
    }

    fn bf_rd(&self) -> bool {
        let mut s = self.state.borrow_mut();
        s.bf_polls += 1;
        s.rx.is_some()
    }

    fn ackdt_wr(&self, nack: bool) {
        self.state.borrow_mut().ackdt = nack;
    }

    fn acken_set(&self) {
        let mut s = self.state.borrow_mut();
        let event = if s.ackdt { Event::Nack } else { Event::Ack };
        s.events.push(event);
    }

    fn acken_rd(&self) -> bool {
        false
    }
}
