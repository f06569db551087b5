/// Checks if left and right are close one to each other.
/// Panics if the two values are more than 0.5% apart.
#[macro_export]
macro_rules! assert_nearly_equals {
    ($left:expr, $right:expr) => {{
        assert_nearly_equals!($left, $right, 0.0005);
    }};
    ($left:expr, $right:expr, $epsilon:expr) => {{
        match (&$left, &$right, &$epsilon) {
            (left_val, right_val, epsilon_val) => {
                let diff = (left_val - right_val).abs();
                let add = left_val.abs() + right_val.abs();
                if diff > *epsilon_val * add {
                    panic!(
                        r#"assertion failed: `abs(left-right)/(abs(left)+abs(right)) < epsilon`
   left: `{:?}`,
   right: `{:?}`,
   epsilon: `{:?}`"#,
                        &*left_val, &*right_val, &*epsilon_val
                    )
                }
            }
        }
    }};
}

#[cfg(test)]
mod test {

    #[test]
    fn test_nearly_equals_accepts_rounding_noise() {
        assert_nearly_equals!(1.0f32, 1.0001f32);
        assert_nearly_equals!(0.0f32, 0.0f32);
    }

    #[test]
    #[should_panic]
    fn test_nearly_equals_rejects_distinct_values() {
        assert_nearly_equals!(1.0f32, 1.1f32);
    }
}
