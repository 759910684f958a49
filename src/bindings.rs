//! Named input → output bindings between interactive elements.
//!
//! Every interactive element that other elements depend on is an [`Input`];
//! every element recomputed from inputs is an [`Output`]. When an input
//! changes, only the outputs bound to it are re-evaluated.

/// An interactive element whose value other elements depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    CountrySelected,
    CitySelected,
    YearRangeChanged,
}

/// A derived element recomputed from inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Output {
    CityOptions,
    TableRows,
}

/// A declared dependency of an output on a set of inputs.
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    pub name: &'static str,
    pub inputs: &'static [Input],
    pub output: Output,
}

/// All bindings in the dashboard. No other cross-element reactivity exists.
pub const BINDINGS: &[Binding] = &[
    Binding {
        name: "update_city_dropdown",
        inputs: &[Input::CountrySelected],
        output: Output::CityOptions,
    },
    Binding {
        name: "update_table",
        inputs: &[
            Input::CountrySelected,
            Input::CitySelected,
            Input::YearRangeChanged,
        ],
        output: Output::TableRows,
    },
];

/// Bindings to re-evaluate after `input` changed, in declaration order.
pub fn affected_bindings(input: Input) -> Vec<&'static Binding> {
    BINDINGS
        .iter()
        .filter(|b| b.inputs.contains(&input))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn affected_outputs(input: Input) -> Vec<Output> {
        affected_bindings(input).into_iter().map(|b| b.output).collect()
    }

    #[test]
    fn country_drives_cities_and_table() {
        assert_eq!(
            affected_outputs(Input::CountrySelected),
            vec![Output::CityOptions, Output::TableRows]
        );
    }

    #[test]
    fn city_and_years_drive_only_the_table() {
        assert_eq!(affected_outputs(Input::CitySelected), vec![Output::TableRows]);
        assert_eq!(affected_outputs(Input::YearRangeChanged), vec![Output::TableRows]);
    }

    #[test]
    fn every_output_has_exactly_one_binding() {
        for output in [Output::CityOptions, Output::TableRows] {
            assert_eq!(BINDINGS.iter().filter(|b| b.output == output).count(), 1);
        }
    }
}
