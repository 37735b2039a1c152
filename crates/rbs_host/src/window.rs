use anyhow::Result;
use rbs_core::deque::CircularDeque;

/// Pushes `values` into an overwrite-on-full window of `capacity` slots and
/// prints what survived, front to back, followed by the buffer summary.
pub fn run_window(capacity: usize, front: bool, values: &[i64]) -> Result<()> {
    let window = fill_window(capacity, front, values)?;

    for value in &window {
        println!("Value: {}", value);
    }
    println!("{}", window);
    Ok(())
}

fn fill_window(capacity: usize, front: bool, values: &[i64]) -> Result<CircularDeque<i64>> {
    let mut window = CircularDeque::new(capacity)?;
    for &value in values {
        if front {
            window.push_front(value);
        } else {
            window.push_back(value);
        }
    }
    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_window_keeps_latest_first() {
        let window = fill_window(5, true, &[10, 14, 17, 134, 11, 183, 91]).unwrap();
        let kept: Vec<i64> = window.iter().copied().collect();
        assert_eq!(kept, vec![91, 183, 11, 134, 17]);
    }

    #[test]
    fn back_window_keeps_latest_last() {
        let window = fill_window(3, false, &[1, 2, 3, 4, -5]).unwrap();
        let kept: Vec<i64> = window.iter().copied().collect();
        assert_eq!(kept, vec![3, 4, -5]);
    }

    #[test]
    fn zero_capacity_is_an_error() {
        let err = fill_window(0, false, &[1]).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }
}
