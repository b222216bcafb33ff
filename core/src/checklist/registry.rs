use crate::error::{CoreError, CoreResult};

use super::model::{ChecklistItem, SectionChecklist, SectionId};

/// Itemized obligations drafted from Chapter II, one list per section.
pub fn dpdpa_chapter2_checklists() -> Vec<SectionChecklist> {
    let mut sections = vec![
        section(
            SectionId::Section4,
            &[
                "Personal data is processed only for a lawful purpose.",
                "The lawful purpose is backed by explicit consent from the Data Principal or falls under the legitimate uses of Section 7.",
                "The lawful purpose is not expressly forbidden by any law.",
            ],
        ),
        section(
            SectionId::Section5,
            &[
                "Notice is provided before or at the time of requesting consent.",
                "The notice clearly states the personal data being collected, the purpose of processing, how to exercise rights under Section 6(4) and Section 13, and how to lodge a complaint with the Board.",
                "For personal data collected before the Act, a retrospective notice covering all of the above is issued as soon as practicable.",
            ],
        ),
        section(
            SectionId::Section6,
            &[
                "Consent is free, specific, informed, unconditional and unambiguous.",
                "Consent is given through a clear affirmative action.",
                "Consent is limited to the specified purpose only.",
                "Consent can be withdrawn at any time.",
                "The Data Fiduciary ceases processing upon withdrawal of consent unless processing is required by law.",
                "Where a Consent Manager is used, it is registered, functions independently, lets the Data Principal give, manage and withdraw consent easily, and logs consent history for audit.",
                "The Data Fiduciary honours withdrawal requests promptly.",
                "Retention of personal data stops after withdrawal unless required by law.",
            ],
        ),
        section(
            SectionId::Section7,
            &[
                "Processing without consent for specified government subsidies, services, benefits or licences.",
                "Processing without consent for State functions such as national security or law enforcement.",
                "Processing without consent to comply with a legal obligation.",
                "Processing without consent under a court order or judgment.",
                "Processing without consent for medical emergencies or disasters.",
                "Processing without consent for employment-related purposes with safeguards.",
                "Processing without consent for corporate security or internal fraud prevention.",
                "Each legitimate use is necessary and proportionate.",
                "Each legitimate use adheres to the standards and rules to be prescribed.",
            ],
        ),
        section(
            SectionId::Section8,
            &[
                "The Data Fiduciary is fully accountable for processing by itself or by its Data Processor.",
                "Processing by a Data Processor takes place under a valid contract.",
                "Personal data used to influence decisions or shared with another Data Fiduciary is complete, accurate and consistent.",
                "Technical and organisational measures are implemented for compliance.",
                "Reasonable security safeguards are taken to prevent personal data breaches.",
                "Personal data breaches are reported to the Data Protection Board and to affected Data Principals.",
                "Personal data is erased when consent is withdrawn or the purpose is no longer served, and the Data Processor is instructed to erase it too.",
                "Retention periods are defined based on the inactivity of the Data Principal.",
                "Business contact information of the Data Protection Officer or responsible officer is published.",
                "A grievance redressal mechanism is established.",
            ],
        ),
        section(
            SectionId::Section9,
            &[
                "Verifiable consent of a parent or lawful guardian is obtained before processing personal data of children under 18 or of persons with a lawful guardian.",
                "No processing is undertaken that is likely to cause a detrimental effect on the well-being of a child.",
                "No tracking, behavioural monitoring or targeted advertising is directed at children.",
                "Any exemptions notified for classes of Data Fiduciaries or purposes are followed.",
                "Relaxed obligations are relied on only where processing is notified as verifiably safe and meets the minimum age threshold.",
            ],
        ),
        section(
            SectionId::Section10,
            &[
                "A Data Protection Officer is appointed who is based in India, reports to the board or a similar governing body, and is the point of contact for grievance redressal.",
                "An independent Data Auditor is appointed.",
                "Periodic Data Protection Impact Assessments, audits of data processing and any other prescribed measures are conducted.",
            ],
        ),
    ];
    sections.sort_by_key(|s| s.section_id);
    sections
}

fn section(section_id: SectionId, items: &[&str]) -> SectionChecklist {
    SectionChecklist {
        section_id,
        items: items.iter().map(|text| ChecklistItem::new(*text)).collect(),
    }
}

/// Read-only lookup of section checklists, held in section order.
#[derive(Debug, Clone)]
pub struct ChecklistRegistry {
    sections: Vec<SectionChecklist>,
}

impl ChecklistRegistry {
    pub fn builtin() -> Self {
        Self {
            sections: dpdpa_chapter2_checklists(),
        }
    }

    pub fn from_sections(mut sections: Vec<SectionChecklist>) -> CoreResult<Self> {
        sections.sort_by_key(|s| s.section_id);
        if sections
            .windows(2)
            .any(|pair| pair[0].section_id == pair[1].section_id)
        {
            return Err(CoreError::InvalidInput(
                "checklist registry contains a duplicated section".to_string(),
            ));
        }
        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[SectionChecklist] {
        &self.sections
    }

    pub fn section_ids(&self) -> Vec<SectionId> {
        self.sections.iter().map(|s| s.section_id).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, section_id: SectionId) -> CoreResult<&SectionChecklist> {
        self.sections
            .iter()
            .find(|s| s.section_id == section_id)
            .ok_or_else(|| CoreError::UnknownSection(section_id.to_string()))
    }

    pub fn get_checklist(&self, section_id: &str) -> CoreResult<&SectionChecklist> {
        self.section(section_id.parse()?)
    }

    /// Flags one item (0-based) as critical so that leaving it unmatched forces Major severity.
    pub fn mark_critical(&mut self, section_id: SectionId, item_index: usize) -> CoreResult<()> {
        let checklist = self
            .sections
            .iter_mut()
            .find(|s| s.section_id == section_id)
            .ok_or_else(|| CoreError::UnknownSection(section_id.to_string()))?;
        let count = checklist.items.len();
        let item = checklist.items.get_mut(item_index).ok_or_else(|| {
            CoreError::InvalidInput(format!(
                "{} has {} checklist items, no item at index {}",
                section_id, count, item_index
            ))
        })?;
        item.critical = true;
        Ok(())
    }
}

impl Default for ChecklistRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
