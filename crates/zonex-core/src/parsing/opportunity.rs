//! Parser for state opportunity zone listings.
//!
//! The table columns come out of extraction as separate lines, so each
//! record is a vertical group: area name (one or more lines), the
//! designation date, then the designation period (which may wrap onto a
//! second line). Grouping walks the line stream and re-anchors on date
//! lines.

use chrono::NaiveDate;

use crate::extraction::PageText;
use crate::model::OpportunityZoneRecord;
use crate::parsing::{parse_long_date, parse_period, push_warning};

/// Records and recoverable problems from one parse pass.
#[derive(Debug, Default)]
pub struct ParsedAreas {
    pub records: Vec<OpportunityZoneRecord>,
    pub warnings: Vec<String>,
}

/// Group the document's lines into area/date/period records.
pub fn extract_from_pages(pages: &[PageText]) -> ParsedAreas {
    let lines: Vec<&str> = pages
        .iter()
        .flat_map(|p| p.lines.iter())
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !is_boilerplate(l))
        .collect();

    let mut out = ParsedAreas::default();
    let mut i = 0;
    while i < lines.len() {
        // Stray date or period lines left over from a broken group.
        if parse_long_date(lines[i]).is_some() || parse_period(lines[i]).is_some() {
            i += 1;
            continue;
        }

        // Collect area lines until the designation date shows up.
        let mut area_parts = vec![lines[i]];
        let mut j = i + 1;
        while j < lines.len() {
            let next = lines[j];
            if parse_long_date(next).is_some() {
                break;
            }
            // Amendment notes and "and"-joined names continue the area
            // even when they could be mistaken for something else.
            if next.starts_with("amended") || next.to_lowercase().contains("and") {
                area_parts.push(next);
                j += 1;
                continue;
            }
            if parse_period(next).is_some() {
                break;
            }
            area_parts.push(next);
            j += 1;
        }
        if j >= lines.len() {
            break;
        }

        let mut date_val = parse_long_date(lines[j]);
        if date_val.is_none() && j + 1 < lines.len() {
            let lower = lines[j].to_lowercase();
            if lower.contains("amended") || lower.contains("and") {
                j += 1;
                date_val = parse_long_date(lines[j]);
            }
        }
        let Some(designated) = date_val else {
            i = j + 1;
            continue;
        };

        // Accumulate period text; it may wrap onto a second line. A date
        // on the line after the current one means the next group started
        // and this one never had a complete period.
        let mut k = j + 1;
        let mut period_str = String::new();
        while k < lines.len() {
            if !period_str.is_empty() {
                period_str.push(' ');
            }
            period_str.push_str(lines[k]);
            if k + 1 < lines.len() && parse_long_date(lines[k + 1]).is_some() {
                break;
            }
            if parse_period(&period_str).is_some() {
                break;
            }
            k += 1;
        }

        if let Some((start, end)) = parse_period(&period_str) {
            let area = area_parts.join(" ");
            push_record(&mut out, &area, designated, start, end);
        }
        i = k + 1;
    }

    out
}

fn push_record(
    out: &mut ParsedAreas,
    area: &str,
    designated: NaiveDate,
    start: i32,
    end: i32,
) {
    match OpportunityZoneRecord::new(area, designated, start, end) {
        Ok(record) => out.records.push(record),
        Err(e) => push_warning(&mut out.warnings, format!("{}: dropped \"{}\"", e, area)),
    }
}

/// Legal boilerplate, column headers, and footnotes that surround the
/// table in every published revision.
fn is_boilerplate(line: &str) -> bool {
    if line.contains("Updated as of") {
        return true;
    }
    if line.starts_with("Page ") && line.contains(" of ") {
        return true;
    }
    if line.contains("STATE OPPORTUNITY ZONE") || line.contains("O.C.G.A") {
        return true;
    }
    if line.contains("Designated Area") && line.contains("Date") {
        return true;
    }
    if line.contains("Designated Area *")
        || line.contains("Date Designated")
        || line.contains("Designation Period")
    {
        return true;
    }
    if line.starts_with('*') || line.contains("https://") {
        return true;
    }
    if line.contains("within or adjacent")
        || line.contains("greater as determined")
        || line.contains("included within")
        || line.contains("has been adopted")
        || line.contains("community affairs")
        || line.contains("Designations made")
        || line.contains("poverty rate")
        || line.contains("census block")
        || line.contains("displays pervasive")
    {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(lines: &[&str]) -> Vec<PageText> {
        vec![PageText {
            page_number: 1,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }]
    }

    #[test]
    fn test_three_line_group() {
        let parsed = extract_from_pages(&pages(&[
            "Acworth",
            "March 5, 2021",
            "2021 through 2030",
        ]));
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.records.len(), 1);
        let r = &parsed.records[0];
        assert_eq!(r.area, "Acworth");
        assert_eq!(
            r.designated_date,
            NaiveDate::from_ymd_opt(2021, 3, 5).unwrap()
        );
        assert_eq!((r.start_year, r.end_year), (2021, 2030));
    }

    #[test]
    fn test_period_wrapped_onto_second_line() {
        let parsed = extract_from_pages(&pages(&[
            "College Park",
            "June 14, 2019",
            "2019 though",
            "2028",
        ]));
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(
            (parsed.records[0].start_year, parsed.records[0].end_year),
            (2019, 2028)
        );
    }

    #[test]
    fn test_multi_line_area() {
        let parsed = extract_from_pages(&pages(&[
            "City of",
            "Sandersville",
            "August 1, 2020",
            "2020 through 2029",
        ]));
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].area, "City of Sandersville");
    }

    #[test]
    fn test_boilerplate_does_not_break_groups() {
        let parsed = extract_from_pages(&pages(&[
            "STATE OPPORTUNITY ZONE DESIGNATIONS",
            "Designated Area *    Date Designated    Designation Period",
            "Acworth",
            "March 5, 2021",
            "2021 through 2030",
            "Page 1 of 4",
            "* Designation boundaries are approximate",
            "Tifton",
            "May 5, 2021",
            "2021 through 2030",
            "https://dca.ga.gov/zones",
        ]));
        assert!(parsed.warnings.is_empty());
        let areas: Vec<&str> = parsed.records.iter().map(|r| r.area.as_str()).collect();
        assert_eq!(areas, vec!["Acworth", "Tifton"]);
    }

    #[test]
    fn test_published_year_typo_is_corrected() {
        let parsed = extract_from_pages(&pages(&[
            "Tifton",
            "May 5, 2021",
            "3021 through 3030",
        ]));
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(
            (parsed.records[0].start_year, parsed.records[0].end_year),
            (2021, 2030)
        );
    }

    #[test]
    fn test_out_of_range_period_becomes_warning() {
        let parsed = extract_from_pages(&pages(&[
            "Oldtown",
            "June 1, 2015",
            "1995 through 2004",
        ]));
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].contains("Oldtown"));
    }

    #[test]
    fn test_stray_leading_lines_are_skipped() {
        let parsed = extract_from_pages(&pages(&[
            "March 5, 2021",
            "2021 through 2030",
            "Acworth",
            "March 5, 2021",
            "2021 through 2030",
        ]));
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].area, "Acworth");
    }

    #[test]
    fn test_group_without_period_is_dropped() {
        let parsed = extract_from_pages(&pages(&[
            "Nowhere",
            "April 1, 2020",
            "no period on this line",
        ]));
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn test_dash_variants_normalized_in_area() {
        let parsed = extract_from_pages(&pages(&[
            "Macon\u{2013}Bibb",
            "July 9, 2018",
            "2018 through 2027",
        ]));
        assert_eq!(parsed.records[0].area, "Macon-Bibb");
    }
}
