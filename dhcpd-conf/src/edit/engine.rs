use std::ops::Range;

use crate::document::{find_reservation_block, ConfigDocument};
use crate::edit::outcome::{EditError, Outcome};
use crate::record::{build_fqdn, ReservationRecord};
use crate::scanner::HostBlock;
use crate::writer::{build_reservation_block, line_ending, render_block, with_line_ending};

/// Answers yes/no questions raised while resolving conflicts.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<C: Confirm + ?Sized> Confirm for &mut C {
    fn confirm(&mut self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}

/// Accepts every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAccept;

impl Confirm for AlwaysAccept {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Declines every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDecline;

impl Confirm for AlwaysDecline {
    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}

/// Adapts a closure into a [`Confirm`] implementation.
pub struct ConfirmFn<F>(pub F);

impl<F: FnMut(&str) -> bool> Confirm for ConfirmFn<F> {
    fn confirm(&mut self, prompt: &str) -> bool {
        (self.0)(prompt)
    }
}

/// How a MAC bound to a different host is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Ask before deleting the stale block.
    Prompt,
    /// Fail the record and leave the text untouched.
    Fail,
}

/// Applies reservation changes to one owned configuration buffer.
///
/// Records are applied in call order, so each one sees the effect of the
/// previous ones. No call ever fails outright: problems are reported through
/// [`Outcome::Failed`] and leave the buffer as it was.
pub struct ReservationEditor<C> {
    text: String,
    domain: String,
    policy: ConflictPolicy,
    confirm: C,
}

impl<C: Confirm> ReservationEditor<C> {
    pub fn new(text: String, domain: impl Into<String>, policy: ConflictPolicy, confirm: C) -> Self {
        Self {
            text,
            domain: domain.into(),
            policy,
            confirm,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Add a reservation, or update the host's existing block.
    pub fn add(&mut self, record: &ReservationRecord) -> Outcome {
        let fqdn = build_fqdn(&record.hostname, &self.domain);

        let mut target = None;
        while let Some(block) = ConfigDocument::parse(&self.text)
            .block_for_mac(&record.mac)
            .cloned()
        {
            let Some(existing) = block.reservation() else {
                break;
            };
            if existing.fqdn == fqdn {
                if existing.ip == record.ip {
                    tracing::info!(host = %fqdn, mac = %record.mac, ip = %record.ip, "Reservation already present");
                    return Outcome::Unchanged;
                }
                tracing::info!(host = %fqdn, from = %existing.ip, to = %record.ip, "Updating reservation address");
                target = Some(block);
                break;
            }

            tracing::warn!(mac = %record.mac, existing = %existing, "MAC already assigned to another host");
            if self.policy == ConflictPolicy::Fail {
                return Outcome::Failed(EditError::Conflict {
                    mac: record.mac.clone(),
                    existing,
                });
            }

            let prompt = format!(
                "Do you want to remove the old reservation ({existing}) and add the new one ({fqdn} -> {} -> {})?",
                record.mac, record.ip
            );
            if !self.confirm.confirm(&prompt) {
                tracing::info!(host = %fqdn, "Conflict resolution declined");
                return Outcome::Skipped {
                    reason: "user declined".to_string(),
                };
            }
            // Only the block shown in the prompt is deleted, even when other
            // blocks share its name.
            if !self.remove_span(block.span.clone()) {
                return Outcome::Failed(EditError::ConflictUnresolved {
                    host: existing.fqdn,
                });
            }
            tracing::info!(host = %existing.fqdn, "Removed conflicting reservation");
        }

        let target = target.or_else(|| {
            ConfigDocument::parse(&self.text)
                .block_for_host(&fqdn)
                .cloned()
        });
        match target {
            Some(block) => self.rewrite(&fqdn, record, &block),
            None => self.append(&fqdn, record),
        }
    }

    /// Remove the block for `hostname`; a missing block is not an error.
    pub fn remove(&mut self, hostname: &str) -> Outcome {
        let fqdn = build_fqdn(hostname, &self.domain);
        let removed = match find_reservation_block(&self.text, &fqdn) {
            Some(span) => self.remove_span(span),
            None => false,
        };
        if removed {
            tracing::info!(host = %fqdn, "Removed reservation");
            Outcome::Removed
        } else {
            tracing::debug!(host = %fqdn, "No reservation to remove");
            Outcome::NotFound
        }
    }

    fn append(&mut self, fqdn: &str, record: &ReservationRecord) -> Outcome {
        let newline = line_ending(&self.text);
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push_str(newline);
        }
        let block = build_reservation_block(fqdn, &record.mac, &record.ip, "");
        self.text.push_str(&with_line_ending(block, newline));
        tracing::info!(host = %fqdn, mac = %record.mac, ip = %record.ip, "Added reservation");
        Outcome::Added
    }

    fn rewrite(&mut self, fqdn: &str, record: &ReservationRecord, block: &HostBlock) -> Outcome {
        let source = &self.text[block.span.clone()];
        let newline = if source.contains('\n') {
            line_ending(source)
        } else {
            line_ending(&self.text)
        };
        let rendered = with_line_ending(
            render_block(fqdn, &record.mac, &record.ip, &block.indent, &block.extras),
            newline,
        );
        if source == rendered {
            return Outcome::Unchanged;
        }
        if !block.extras.is_empty() {
            tracing::warn!(
                host = %fqdn,
                preserved = block.extras.len(),
                "Carrying unrecognized directives into rewritten block"
            );
        }
        self.text.replace_range(block.span.clone(), &rendered);
        tracing::info!(host = %fqdn, mac = %record.mac, ip = %record.ip, "Updated reservation");
        Outcome::Updated {
            preserved_directives: block.extras.len(),
        }
    }

    /// Delete the block at `span`. When it sits in its own paragraph, one of
    /// the blank lines around it goes too: the one after it, or the one
    /// before it when nothing follows.
    fn remove_span(&mut self, span: Range<usize>) -> bool {
        if span.is_empty() || self.text.get(span.clone()).is_none() {
            return false;
        }

        let before = &self.text[..span.start];
        let separated = before.is_empty() || before.ends_with("\n\n") || before.ends_with("\n\r\n");
        let ends_line = self.text[..span.end].ends_with('\n');
        let rest = &self.text[span.end..];
        let (mut start, mut end) = (span.start, span.end);
        if separated && ends_line {
            if rest.starts_with("\r\n") {
                end += 2;
            } else if rest.starts_with('\n') {
                end += 1;
            } else if rest.is_empty() && !before.is_empty() {
                start -= if before.ends_with("\r\n") { 2 } else { 1 };
            }
        }

        self.text.replace_range(start..end, "");
        true
    }
}

/// Apply one add to `text`, returning the new text and the outcome.
pub fn add_reservation(
    text: String,
    record: &ReservationRecord,
    domain: &str,
    policy: ConflictPolicy,
    confirm: &mut dyn Confirm,
) -> (String, Outcome) {
    let mut editor = ReservationEditor::new(text, domain, policy, confirm);
    let outcome = editor.add(record);
    (editor.into_text(), outcome)
}

/// Apply one removal to `text`, returning the new text and the outcome.
pub fn remove_reservation(text: String, hostname: &str, domain: &str) -> (String, Outcome) {
    let mut editor = ReservationEditor::new(text, domain, ConflictPolicy::Fail, AlwaysDecline);
    let outcome = editor.remove(hostname);
    (editor.into_text(), outcome)
}
