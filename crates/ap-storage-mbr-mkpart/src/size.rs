const UNITS: [&str; 7] = ["B", "K", "M", "G", "T", "P", "E"];

/// Format a byte count for humans, e.g. `4.9K` or `512M`.
pub fn human_size(len: u64) -> String {
    let mut len = len;
    let mut unit = 0;
    while len > 10240 {
        len >>= 10;
        unit += 1;
    }
    let value = if len > 1024 {
        unit += 1;
        len as f32 / 1024.0
    } else {
        len as f32
    };
    if value > 10.0 {
        format!("{}{}", value as u64, UNITS[unit])
    } else {
        format!("{:.1}{}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units() {
        assert_eq!("0.0B", human_size(0));
        assert_eq!("512B", human_size(512));
        assert_eq!("4.9K", human_size(5000));
        assert_eq!("19K", human_size(20000));
        assert_eq!("512M", human_size(512 << 20));
        assert_eq!("1024M", human_size(1 << 30));
        assert_eq!("15E", human_size(u64::MAX));
    }
}
