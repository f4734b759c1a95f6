use super::decoder::MergeBlameDecoder;
use super::types::BlameLine;

/// Parse complete `svn blame --xml --use-merge-history` output into a
/// Vec<BlameLine>.
///
/// The captured output looks like:
/// ```text
/// <?xml version="1.0" encoding="UTF-8"?>
/// <blame>
/// <target
///    path="pom.xml">
/// <entry
///    line-number="1">
/// <commit
///    revision="38858">
/// <author>vpiyanov</author>
/// <date>2012-05-03T10:15:22.989855Z</date>
/// </commit>
/// <merged
///    path="/branches/b1/pom.xml"
///    revision="38820">
/// <author>s.zamyslov</author>
/// <date>2012-04-21T00:45:24.158572Z</date>
/// </merged>
/// </entry>
/// ...
/// </target>
/// </blame>
/// ```
///
/// The `<merged>` block is only present when the repository has merge
/// tracking data for the line; without it the line is attributed to its
/// committer on both sides.
///
/// Feeds the captured bytes line by line through a fresh
/// `MergeBlameDecoder`, exactly as the command invoker streams the svn
/// client's stdout. Non-UTF-8 input yields an empty result.
pub fn parse_blame_output(raw: &[u8]) -> Vec<BlameLine> {
    let input = match std::str::from_utf8(raw) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut decoder = MergeBlameDecoder::new();
    for line in input.lines() {
        decoder.consume_line(line);
    }
    decoder.into_lines()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_merged_entry() {
        let raw = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<blame>\n<target\n   path=\"pom.xml\">\n<entry\n   line-number=\"1\">\n<commit\n   revision=\"38858\">\n<author>vpiyanov</author>\n<date>2012-05-03T10:15:22.989855Z</date>\n</commit>\n<merged\n   revision=\"38820\">\n<author>s.zamyslov</author>\n<date>2012-04-21T00:45:24.158572Z</date>\n</merged>\n</entry>\n</target>\n</blame>\n";
        let lines = parse_blame_output(raw);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line_number, 1);
        assert_eq!(lines[0].committer_revision, "38858");
        assert_eq!(lines[0].committer, "vpiyanov");
        assert_eq!(lines[0].author, "s.zamyslov");
        assert!(lines[0].committer_date.is_some());
    }

    #[test]
    fn test_parse_blame_empty() {
        let lines = parse_blame_output(b"");
        assert!(lines.is_empty());
    }

    #[test]
    fn test_parse_blame_invalid_utf8() {
        let lines = parse_blame_output(&[0xff, 0xfe, 0xfd]);
        assert!(lines.is_empty());
    }
}
