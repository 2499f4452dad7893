//! Embedded transaction fixture served in mock mode.
//!
//! Shaped exactly like USASpending.gov transaction-search rows. The set is
//! chosen to exercise the whole pipeline: qualifying signals, kill-switch
//! rejections, an unmatchable private awardee and a malformed row.

use serde_json::{json, Value};

pub fn sample_transactions() -> Vec<Value> {
    vec![
        // Small-cap defense win with a large award: qualifies
        json!({
            "Recipient Name": "KRATOS DEFENSE & SECURITY SOLUTIONS, INC.",
            "Award ID": "FA861724C0001",
            "Mod": "P00003",
            "Action Date": "2025-07-30",
            "Transaction Amount": 150_000_000.0,
            "Awarding Agency": "Department of Defense",
            "Awarding Sub Agency": "Department of the Air Force",
            "Action Type": "C",
            "Transaction Description": "HYPERSONIC TEST VEHICLE PRODUCTION LOT 3",
            "generated_internal_id": "CONT_AWD_FA861724C0001_9700",
        }),
        // Micro-cap biotech, award larger than a fifth of the company: qualifies
        json!({
            "Recipient Name": "SIGA TECHNOLOGIES, INC.",
            "Award ID": "75A50123C00051",
            "Mod": "2",
            "Action Date": "2025-07-28",
            "Transaction Amount": 120_000_000.0,
            "Awarding Agency": "Department of Health and Human Services",
            "Awarding Sub Agency": "Administration for Strategic Preparedness and Response",
            "Action Type": "C",
            "Transaction Description": "TPOXX SMALLPOX ANTIVIRAL PROCUREMENT",
            "generated_internal_id": "CONT_AWD_75A50123C00051_7505",
        }),
        // Micro-cap vaccine maker: qualifies
        json!({
            "Recipient Name": "EMERGENT BIOSOLUTIONS INC.",
            "Award ID": "W911QY25C0012",
            "Mod": "0",
            "Action Date": "2025-08-01",
            "Transaction Amount": 75_000_000.0,
            "Awarding Agency": "Department of Defense",
            "Awarding Sub Agency": "Department of the Army",
            "Action Type": "A",
            "Transaction Description": "MEDICAL COUNTERMEASURE ADVANCED DEVELOPMENT",
            "generated_internal_id": "CONT_AWD_W911QY25C0012_2100",
        }),
        // Mega-cap prime: rejected by the market-cap kill switch
        json!({
            "Recipient Name": "LOCKHEED MARTIN CORPORATION",
            "Award ID": "N0001925C0100",
            "Mod": "P00021",
            "Action Date": "2025-07-31",
            "Transaction Amount": 1_200_000_000.0,
            "Awarding Agency": "Department of Defense",
            "Awarding Sub Agency": "Department of the Navy",
            "Action Type": "C",
            "Transaction Description": "F-35 LIGHTNING II LOT 19 PRODUCTION",
            "generated_internal_id": "CONT_AWD_N0001925C0100_1700",
        }),
        // Mid-cap consultancy, award tiny next to the company: impact too small
        json!({
            "Recipient Name": "BOOZ ALLEN HAMILTON INC.",
            "Award ID": "GS00Q14OADU208",
            "Mod": "15",
            "Action Date": "2025-07-29",
            "Transaction Amount": 45_000_000.0,
            "Awarding Agency": "General Services Administration",
            "Awarding Sub Agency": "Federal Acquisition Service",
            "Action Type": "B",
            "Transaction Description": "ENTERPRISE IT MODERNIZATION SUPPORT",
            "generated_internal_id": "CONT_AWD_GS00Q14OADU208_4732",
        }),
        // Privately held awardee: entity resolution rejects it
        json!({
            "Recipient Name": "AMENTUM SERVICES, INC.",
            "Award ID": "W52P1J21D0034",
            "Mod": "8",
            "Action Date": "2025-07-27",
            "Transaction Amount": 210_000_000.0,
            "Awarding Agency": "Department of Defense",
            "Awarding Sub Agency": "Department of the Army",
            "Action Type": "C",
            "Transaction Description": "LOGISTICS CIVIL AUGMENTATION PROGRAM",
            "generated_internal_id": "CONT_AWD_W52P1J21D0034_2100",
        }),
        // Below the minimum award amount: filtered before parsing
        json!({
            "Recipient Name": "SMALL WIDGETS LLC",
            "Award ID": "SP060025P0101",
            "Mod": "0",
            "Action Date": "2025-07-26",
            "Transaction Amount": 500_000.0,
            "Awarding Agency": "Defense Logistics Agency",
            "Awarding Sub Agency": "",
            "Action Type": "A",
            "Transaction Description": "WIDGET RESUPPLY",
            "generated_internal_id": "CONT_AWD_SP060025P0101_97AS",
        }),
        // Malformed row without a recipient: dropped by the parser
        json!({
            "Recipient Name": null,
            "Award ID": "HQ003425F0200",
            "Mod": "1",
            "Action Date": "2025-07-25",
            "Transaction Amount": 9_000_000.0,
            "Awarding Agency": "Department of Defense",
            "Action Type": "C",
            "Transaction Description": "REDACTED",
            "generated_internal_id": "CONT_AWD_HQ003425F0200_9700",
        }),
    ]
}
