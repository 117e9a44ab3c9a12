use super::{line_boundary, numeral, timestamp};
use crate::config::DisplayOptions;
use crate::timestamp::TimestampTracker;

/// Fixed-width columns of numerals.
#[derive(Debug)]
pub struct RawFormatter {
    width: u8,
    column: u8,
    display: DisplayOptions,
}

impl RawFormatter {
    pub fn new(width: u8, display: DisplayOptions) -> Self {
        Self {
            width: width.max(1),
            column: 0,
            display,
        }
    }

    pub fn push(&mut self, byte: u8, stamps: &mut TimestampTracker, out: &mut String) {
        if self.column == 0 {
            line_boundary(&self.display, out);
            timestamp(&self.display, stamps, out);
        }

        numeral(&self.display, byte, out);

        self.column += 1;
        if self.column >= self.width {
            self.column = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NumeralBase;
    use crate::format::test_support::render;
    use crate::format::{Formatter, CLEAR_SCREEN};

    fn raw(width: u8, display: DisplayOptions) -> Formatter {
        Formatter::Raw(RawFormatter::new(width, display))
    }

    #[test]
    fn breaks_every_width_bytes() {
        let mut f = raw(4, DisplayOptions::default());
        assert_eq!(
            render(&mut f, &[0x00, 0x01, 0x02, 0x03, 0x04]),
            "\n 0  1  2  3 \n 4 "
        );
    }

    #[test]
    fn width_one_breaks_before_every_byte() {
        let mut f = raw(1, DisplayOptions::default());
        assert_eq!(render(&mut f, &[0xab, 0xcd]), "\nab \ncd ");
    }

    #[test]
    fn decimal_zero_padded() {
        let display = DisplayOptions {
            base: NumeralBase::Decimal,
            zero_pad: true,
            ..Default::default()
        };
        let mut f = raw(8, display);
        assert_eq!(render(&mut f, &[1, 42, 200]), "\n001 042 200 ");
    }

    #[test]
    fn single_line_clears_instead_of_newline() {
        let display = DisplayOptions {
            single_line: true,
            ..Default::default()
        };
        let mut f = raw(2, display);
        assert_eq!(
            render(&mut f, &[0x10, 0x11, 0x12]),
            format!("{CLEAR_SCREEN}10 11 {CLEAR_SCREEN}12 ")
        );
    }

    #[test]
    fn color_does_not_apply() {
        let display = DisplayOptions {
            color: true,
            ..Default::default()
        };
        let mut f = raw(8, display);
        assert_eq!(render(&mut f, &[0x90]), "\n90 ");
    }

    #[test]
    fn timestamp_follows_each_boundary() {
        let mut display = DisplayOptions::default();
        display.timestamps.delta_sec = true;
        let mut f = raw(2, display);
        let out = render(&mut f, &[1, 2, 3]);
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "0.000000:  1  2 ");
        assert!(lines[2].ends_with(":  3 "), "unexpected line {:?}", lines[2]);
    }
}
