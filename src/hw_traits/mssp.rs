/// Register-level access to a master synchronous serial port (MSSP) running in I2C master mode.
///
/// Each method maps onto a single control or status bit of the peripheral. The `*_set` methods
/// request a bus action. The matching `*_rd` method reads the same bit back, which the hardware
/// clears once that action has finished.
pub trait Mssp {
    /// Write the baud rate divisor. SCL = FOSC / (4 * (divisor + 1))
    fn sspadd_wr(&self, divisor: u8);
    /// Select I2C master mode with the clock derived from the baud rate divisor
    fn master_mode(&self);
    /// Clear the write collision and receive overflow indicators
    fn clear_errors(&self);
    /// Enable the port and hand the SDA and SCL pins over to it
    fn sspen_set(&self);

    /// Request a start condition
    fn sen_set(&self);
    /// Start condition still in progress
    fn sen_rd(&self) -> bool;

    /// Request a repeated start condition
    fn rsen_set(&self);
    /// Repeated start condition still in progress
    fn rsen_rd(&self) -> bool;

    /// Request a stop condition
    fn pen_set(&self);
    /// Stop condition still in progress
    fn pen_rd(&self) -> bool;

    /// Load the transmit buffer, which starts shifting the byte out
    fn sspbuf_wr(&self, byte: u8);
    /// Read the receive buffer. Clears the buffer-full flag.
    fn sspbuf_rd(&self) -> u8;

    /// Transmit still in progress
    fn rw_rd(&self) -> bool;
    /// Acknowledge status of the last transmitted byte. `true` means the slave NACKed.
    fn ackstat_rd(&self) -> bool;

    /// Enable reception of one byte
    fn rcen_set(&self);
    /// Receive buffer full
    fn bf_rd(&self) -> bool;

    /// Select the handshake bit sent after a received byte. `true` sends a NACK.
    fn ackdt_wr(&self, nack: bool);
    /// Start the acknowledge sequence using the bit selected by `ackdt_wr`
    fn acken_set(&self);
    /// Acknowledge sequence still in progress
    fn acken_rd(&self) -> bool;
}
