mod median;
