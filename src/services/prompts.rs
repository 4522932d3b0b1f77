//! Prompts for the scheme browser
//!
//! The provider has no schema mode here, so each prompt spells out the JSON
//! shape it must answer with.

/// Prompt for the list of currently active schemes.
pub const SUMMARIES_PROMPT: &str = r#"You are an expert on current Indian Government Agricultural Schemes for 2024-25. Fetch all active and ongoing schemes from the Ministry of Agriculture & Farmer Welfare.

Please provide a comprehensive list of current government schemes in the following JSON format (no markdown, just pure JSON):
{
  "schemes": [
    {
      "id": 1,
      "title": "Scheme Name",
      "description": "Brief description of the scheme",
      "eligibility": "Who can apply",
      "benefits": "What benefits are provided",
      "applicationProcess": "How to apply",
      "lastDate": "Deadline or 'Ongoing'",
      "category": "finance|insurance|information|organic|subsidy|equipment",
      "readTime": "X min",
      "popularity": number,
      "successRate": "XX%",
      "officialUrl": "Official website URL"
    }
  ]
}

Include all major active schemes such as:
- PM-KISAN (Pradhan Mantri Kisan Samman Nidhi)
- PMFBY (Pradhan Mantri Fasal Bima Yojana)
- Soil Health Card Scheme
- PKVY (Paramparagat Krishi Vikas Yojana)
- PM-KUSUM (Solar Agriculture Pumps)
- National Agriculture Market (e-NAM)
- Rashtriya Krishi Vikas Yojana (RKVY)
- Sub-Mission on Agricultural Mechanization (SMAM)
- Mission for Integrated Development of Horticulture (MIDH)
- National Mission on Oilseeds and Oil Palm (NMOOP)
- Pradhan Mantri Krishi Sinchai Yojana (PMKSY)
- Formation of Farmer Producer Organizations (FPO)
- And any other currently active schemes

Make sure all information is:
- Current and active as of 2024-25
- From official Ministry of Agriculture sources
- Includes accurate benefit amounts and eligibility criteria
- Contains working official website URLs
- Categorized appropriately

Focus on schemes that are currently accepting applications or are ongoing programs."#;

const DETAIL_SOURCES: &str = r#"Make sure to provide:
- Latest 2024-25 budget allocation and benefit amounts
- Current application status and deadlines
- State-specific variations if applicable
- Recent policy updates or changes
- Exact documentation requirements
- Working official website links
- Valid contact information

Source information from:
- Ministry of Agriculture & Farmer Welfare official website
- PM-KISAN portal for related schemes
- Department of Agriculture & Cooperation
- State agriculture department notifications
- Recent government press releases and announcements"#;

/// Build the detail prompt for one scheme title.
pub fn build_detail_prompt(title: &str) -> String {
    // Titles come from a previous model reply; keep them on one line and
    // stop them from closing the quoted JSON string early.
    let title = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('"', "'");

    format!(
        r#"You are an expert on Indian Government Agricultural Schemes. Fetch the most detailed and current information about "{title}" from official Ministry of Agriculture & Farmer Welfare sources.

Please provide comprehensive details in the following JSON format (no markdown, just pure JSON):
{{
  "title": "{title}",
  "detailedDescription": "very Short description of the scheme with current status and objectives. 1 paragraph only",
  "eligibility": "Very Short eligibility criteria with specific conditions. 1 paragraph only",
  "benefits": "Very Short list of benefits with exact amounts, payment schedules, and coverage",
  "applicationProcess": "3 steps of the current application process with all required steps",
  "requiredDocuments": ["Aadhaar Card", "Bank Passbook", "Land Records", "Other specific documents"],
  "lastDate": "Current application deadline or 'Ongoing' with next review dates",
  "officialUrl": "Official government website URL for direct applications",
  "contactInfo": "Official helpline numbers and email addresses",
  "additionalInfo": "Current budget allocation, number of beneficiaries, recent updates, state-wise variations if any"
}}

{DETAIL_SOURCES}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_prompt_embeds_title_twice() {
        let prompt = build_detail_prompt("PM-KISAN");
        assert!(prompt.contains(r#"information about "PM-KISAN""#));
        assert!(prompt.contains(r#""title": "PM-KISAN""#));
        assert!(prompt.contains("requiredDocuments"));
    }

    #[test]
    fn detail_prompt_neutralizes_quotes_and_newlines() {
        let prompt = build_detail_prompt("Odd \"quoted\"\nname");
        assert!(prompt.contains(r#""title": "Odd 'quoted' name""#));
    }

    #[test]
    fn summaries_prompt_names_the_list_shape() {
        assert!(SUMMARIES_PROMPT.contains(r#""schemes": ["#));
        assert!(SUMMARIES_PROMPT.contains("PM-KISAN"));
    }
}
