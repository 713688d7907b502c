//! Interactive terminal prompts.

use std::io::{self, BufRead, Write};

use crate::destination::Brand;

/// Ask the user to pick one of `brands` by number.
///
/// Re-prompts on input that is not a listed number.
///
/// # Errors
///
/// Returns an error if reading or writing fails, or input ends before a choice is made.
pub fn choose_brand(
    brands: &[Brand],
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<String> {
    writeln!(output, "Several brands are available:")?;

    for (index, brand) in brands.iter().enumerate() {
        match &brand.name {
            Some(name) => writeln!(output, "  {}. {name} ({})", index + 1, brand.brand_id)?,
            None => writeln!(output, "  {}. {}", index + 1, brand.brand_id)?,
        }
    }

    loop {
        write!(output, "Select a brand [1-{}]: ", brands.len())?;
        output.flush()?;

        let line = read_line(input)?;

        let choice = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| brands.get(index));

        match choice {
            Some(brand) => return Ok(brand.brand_id.clone()),
            None => writeln!(output, "Please enter a number between 1 and {}.", brands.len())?,
        }
    }
}

/// Ask a yes/no question. Anything but `y` or `yes` is a no.
///
/// # Errors
///
/// Returns an error if reading or writing fails.
pub fn confirm(question: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{question} [y/N]: ")?;
    output.flush()?;

    let answer = match read_line(input) {
        Ok(line) => line,
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(false),
        Err(error) => return Err(error),
    };

    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn read_line(input: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();

    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before an answer was given",
        ));
    }

    Ok(line)
}
