//! JSON dashboard snapshot

use crate::report::Dashboard;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, dashboard: &Dashboard) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, dashboard)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetLinks;
    use crate::report::tests::{test_config, test_survey};

    #[test]
    fn test_snapshot_fields() {
        let config = test_config();
        let presenter = config.presenter().unwrap();
        let dashboard =
            Dashboard::build(&config, &presenter, &test_survey(1500), &AssetLinks::Served).unwrap();

        let mut out = Vec::new();
        write(&mut out, &dashboard).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["target"], 1500);
        assert_eq!(value["survey"]["column"], "hh_num");
        assert_eq!(value["gauge"]["formatted"], "1,500");
        assert_eq!(value["media"], "image");
        assert_eq!(value["state"]["celebrating"], true);
        assert_eq!(value["state"]["regions"]["overlay"], true);
        assert!(value["state"]["regions"].get("video").is_none());
    }
}
