//! Terminal output for the CLI subcommands.

use std::collections::BTreeMap;

use mold_core::catalog::{options_at, Catalog, MachinePage, MaterialRecord, SelectionLevel, SelectionState};
use mold_core::formulas::{Formula, FormulaCategory};
use mold_core::process::{Limit, LimitStatus, ValidationCheck};
use mold_core::report::QuotationReport;

const RULE: &str = "═══════════════════════════════════════════════════════";

fn status_icon(status: Option<LimitStatus>) -> &'static str {
    match status {
        Some(LimitStatus::Ok) => "[OK]",
        Some(LimitStatus::Close) => "[CLOSE]",
        Some(LimitStatus::Exceeded) => "[EXCEEDED]",
        None => "[--]",
    }
}

fn banner(title: &str) {
    println!("{}", RULE);
    println!("  {}", title);
    println!("{}", RULE);
    println!();
}

pub fn formula_result(formula: Formula, args: &[f64], value: f64) {
    let meta = formula.metadata();
    println!("{}: {}", meta.name, meta.formula_plain);
    for (var, arg) in meta.inputs.iter().zip(args) {
        println!("  {:<6} = {:>12.4} {}", var.key, arg, var.units);
    }
    println!("  {:<6} = {:>12.4} {}", "result", value, meta.result_unit);
}

pub fn formula_list() {
    for category in FormulaCategory::all() {
        println!("{}:", category.display_name());
        for formula in Formula::in_category(category) {
            let meta = formula.metadata();
            let args: Vec<&str> = meta.inputs.iter().map(|v| v.key).collect();
            println!("  {:<22} {:<28} ({})", formula.id(), meta.name, args.join(", "));
        }
        println!();
    }
}

pub fn machine_page(page: &MachinePage<'_>) {
    println!(
        "{:<16} {:<22} {:>10} {:>6} {:>8}  {}",
        "Manufacturer", "Model", "Clamp kN", "Unit", "Screw mm", "Tie bars"
    );
    println!("{}", "-".repeat(80));
    for m in &page.items {
        println!(
            "{:<16} {:<22} {:>10.0} {:>6} {:>8.0}  {}",
            m.manufacturer,
            m.model,
            m.clamping_force_kn,
            m.injection_unit,
            m.screw_diameter_mm,
            m.tie_bar_distance.as_deref().unwrap_or("-")
        );
    }
    println!();
    println!(
        "Page {} of {} ({} matching machines)",
        page.page, page.total_pages, page.total_matches
    );
}

pub fn material_list(groups: &BTreeMap<&str, Vec<&MaterialRecord>>) {
    if groups.is_empty() {
        println!("No matching materials.");
        return;
    }

    for (category, materials) in groups {
        println!("{}:", if category.is_empty() { "Uncategorized" } else { *category });
        for m in materials {
            println!(
                "  {:<10} {:<28} ρ {:<10} melt {:<9} mold {:<7} {:>6.2} €/kg",
                m.id, m.name, m.density, m.melt_temp, m.mold_temp, m.cost_per_kg
            );
        }
        println!();
    }
}

pub fn selection_options(selection: &SelectionState, catalog: &Catalog) {
    for level in SelectionLevel::ALL {
        match selection.get(level) {
            Some(value) => println!("  {:<16} {}", level.display_name(), value),
            None if selection.prerequisites_met(level) => {
                let options: Vec<String> = options_at(level, selection, &catalog.machines)
                    .iter()
                    .map(|v| v.to_string())
                    .collect();
                println!("  {:<16} choose one of: {}", level.display_name(), options.join(", "));
                return;
            }
            None => return,
        }
    }
}

fn check_line(check: &ValidationCheck) {
    let limit = match check.limit {
        Limit::Max { max } if max > 0.0 => format!("max {:.1}", max),
        Limit::Range { min, max } if min != 0.0 || max != 0.0 => format!("{:.0}-{:.0}", min, max),
        _ => "unknown".to_string(),
    };
    println!(
        "  {:<16} {:>10.1} {:<4} ({:<12}) {}",
        check.label,
        check.value,
        check.unit,
        limit,
        status_icon(check.status)
    );
}

pub fn process_sheet(report: &QuotationReport) {
    let r = &report.results;
    let job = &report.meta.job;

    banner("PROCESS SHEET & QUOTATION");

    if !job.customer.is_empty() || !job.part_number.is_empty() {
        println!("Job:      {} / {}", job.customer, job.part_number);
    }
    if !job.engineer.is_empty() {
        println!("Engineer: {}", job.engineer);
    }
    println!(
        "Machine:  {}",
        report.machine.as_ref().map(|m| m.label()).unwrap_or_else(|| "(none selected)".to_string())
    );
    println!(
        "Material: {}",
        report
            .material
            .as_ref()
            .map(|m| format!("{} ({})", m.name, m.id))
            .unwrap_or_else(|| "(manual)".to_string())
    );
    println!();

    println!("Part & Shot:");
    println!("  Part weight      {:>10.2} g", r.part_weight);
    println!("  Shot weight      {:>10.2} g", r.shot_weight_total);
    println!("  Shot volume      {:>10.2} cm³", r.shot_volume_total);
    println!("  Clamping force   {:>10.1} kN", r.clamping_force);
    println!();

    println!("Cycle:");
    println!("  Cooling (calc)   {:>10.2} s", r.cooling_time_calc);
    println!("  Cooling (used)   {:>10.2} s", r.cooling_time_effective);
    println!("  Total cycle      {:>10.2} s", r.total_cycle_time);
    println!("  Recovery         {:>10.2} s", r.recovery_time);
    println!();

    println!("Injection Unit:");
    println!("  Screw diameter   {:>10.1} mm", r.screw_diameter);
    println!("  Max shot volume  {:>10.0}", r.max_shot_volume);
    println!("  Barrel fill      {:>10.1} %", r.shot_vs_barrel);
    println!("  Residence time   {:>10.1} s", r.residence_time);
    println!("  Dosing stroke    {:>10.2} mm", r.dosing_stroke);
    println!("  Screw speed      {:>10.3} m/s", r.screw_speed);
    println!("  Flow ratio       {:>10.1}", r.flow_ratio);
    println!("  Flow rate        {:>10.2} cm³/s", r.flow_rate);
    println!("  Cushion          {:.0}-{:.0}", r.cushion_min, r.cushion_max);
    println!();

    println!("Limit Checks:");
    for check in &report.checks {
        check_line(check);
    }
    println!();

    println!("Cost per Part:");
    println!("  Parts/hour       {:>10.1} ({:.1} good)", r.parts_per_hour, r.good_parts_per_hour);
    println!("  Material         {:>10.4} €", r.material_cost_per_part);
    println!("  Machine          {:>10.4} €", r.machine_cost_per_part);
    println!("  Labor            {:>10.4} €", r.labor_cost_per_part);
    println!("  Tooling          {:>10.4} €", r.amortization_per_part);
    println!("  Energy           {:>10.4} €", r.energy_cost_per_part);
    println!("  Part cost        {:>10.4} €", r.part_cost);
    println!();

    println!("{}", RULE);
    println!(
        "  QUOTE: {:.4} € / part, {:.2} € / year {}",
        r.quoted_price,
        r.total_revenue,
        status_icon(report.worst_status())
    );
    println!("{}", RULE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(Some(LimitStatus::Ok)), "[OK]");
        assert_eq!(status_icon(Some(LimitStatus::Exceeded)), "[EXCEEDED]");
        assert_eq!(status_icon(None), "[--]");
    }
}
